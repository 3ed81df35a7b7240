use serde::{Deserialize, Serialize};

/// Axis a split divides along.
///
/// A horizontal split places its children side by side (left | right) and
/// its divider moves along the x axis; a vertical split stacks them (top over
/// bottom) and its divider moves along the y axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn perpendicular(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Which child of a split a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left child of a horizontal split, top child of a vertical one.
    First,
    /// Right child of a horizontal split, bottom child of a vertical one.
    Second,
}
