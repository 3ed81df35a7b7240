use serde::{Deserialize, Serialize};

use crate::layout_engine::{Orientation, ResizeError};

/// Optionally-set pixel extents requested by one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestDimension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
}

impl RequestDimension {
    pub fn new() -> Self { Self::default() }

    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn set_width(&mut self, width: i32) { self.width = Some(width); }

    pub fn set_height(&mut self, height: i32) { self.height = Some(height); }

    pub fn is_width_set(&self) -> bool { self.width.is_some() }

    pub fn is_height_set(&self) -> bool { self.height.is_some() }

    /// Reading an unset extent is a caller error; check `is_width_set` first.
    pub fn width(&self) -> Result<i32, ResizeError> {
        self.width.ok_or(ResizeError::UnsetDimension {
            orientation: Orientation::Horizontal,
        })
    }

    pub fn height(&self) -> Result<i32, ResizeError> {
        self.height.ok_or(ResizeError::UnsetDimension {
            orientation: Orientation::Vertical,
        })
    }

    /// The extent measured along `orientation`, if set.
    pub fn get(&self, orientation: Orientation) -> Option<i32> {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    pub fn set(&mut self, orientation: Orientation, value: Option<i32>) {
        match orientation {
            Orientation::Horizontal => self.width = value,
            Orientation::Vertical => self.height = value,
        }
    }
}

/// Strength of a resize request on one axis, within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub const FULL: Weight = Weight(1.0);

    pub fn new(value: f64) -> Result<Self, ResizeError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ResizeError::InvalidWeight(value))
        }
    }

    pub fn get(self) -> f64 { self.0 }

    /// Exact comparison against `1.0`.
    #[allow(clippy::float_cmp)]
    pub fn is_full(self) -> bool { self.0 == 1.0 }
}

impl TryFrom<f64> for Weight {
    type Error = ResizeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> { Weight::new(value) }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> f64 { weight.0 }
}

/// Whether an element has an opinion about its size on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRequest {
    #[default]
    Unset,
    Weighted(Weight),
}

impl AxisRequest {
    pub fn weighted(value: f64) -> Result<Self, ResizeError> {
        Weight::new(value).map(AxisRequest::Weighted)
    }

    pub fn full() -> Self { AxisRequest::Weighted(Weight::FULL) }

    /// Accepts the legacy encoding where exactly `-1` means "no opinion".
    #[allow(clippy::float_cmp)]
    pub fn from_fraction(fraction: f64) -> Result<Self, ResizeError> {
        if fraction == -1.0 {
            Ok(AxisRequest::Unset)
        } else {
            Self::weighted(fraction)
        }
    }

    pub fn is_set(self) -> bool { matches!(self, AxisRequest::Weighted(_)) }

    pub fn is_full(self) -> bool { matches!(self, AxisRequest::Weighted(w) if w.is_full()) }

    pub fn weight(self) -> Option<Weight> {
        match self {
            AxisRequest::Unset => None,
            AxisRequest::Weighted(w) => Some(w),
        }
    }

    /// Merges two sibling opinions: an unset side yields, otherwise the
    /// stronger weight is kept.
    pub fn merge(self, other: AxisRequest) -> AxisRequest {
        match (self, other) {
            (AxisRequest::Unset, other) => other,
            (this, AxisRequest::Unset) => this,
            (AxisRequest::Weighted(a), AxisRequest::Weighted(b)) => {
                AxisRequest::Weighted(if b.get() > a.get() { b } else { a })
            }
        }
    }
}

/// Resize intent of a single element of the split tree.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResizeRequest {
    #[serde(default)]
    pub width: AxisRequest,
    #[serde(default)]
    pub height: AxisRequest,
    /// Pixels the element would like to grow (negative: shrink) per axis.
    #[serde(default)]
    pub delta: RequestDimension,
}

impl ResizeRequest {
    pub fn new(width: AxisRequest, height: AxisRequest) -> Self {
        Self {
            width,
            height,
            delta: RequestDimension::default(),
        }
    }

    /// Builds a request from the legacy `-1`-means-unset fractions.
    pub fn from_fractions(fraction_width: f64, fraction_height: f64) -> Result<Self, ResizeError> {
        Ok(Self::new(
            AxisRequest::from_fraction(fraction_width)?,
            AxisRequest::from_fraction(fraction_height)?,
        ))
    }

    pub fn with_delta(mut self, delta: RequestDimension) -> Self {
        self.delta = delta;
        self
    }

    pub fn fraction(&self, orientation: Orientation) -> AxisRequest {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Requested growth along `orientation`, `0` when unset.
    pub fn delta_along(&self, orientation: Orientation) -> f64 {
        self.delta.get(orientation).map_or(0.0, f64::from)
    }
}
