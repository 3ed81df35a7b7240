use thiserror::Error;

use crate::layout_engine::Orientation;
use crate::layout_engine::resize_tree::{ElementId, PanelId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResizeError {
    #[error("resize weight must lie within [0, 1], got {0}")]
    InvalidWeight(f64),
    #[error("{orientation:?} extent of the request dimension is not set")]
    UnsetDimension { orientation: Orientation },
    #[error("element {0:?} is not part of the resize tree")]
    UnknownElement(ElementId),
    #[error("element {0:?} is already attached to a split")]
    AlreadyAttached(ElementId),
    #[error("split needs two distinct children, got {0:?} twice")]
    DegenerateSplit(ElementId),
    #[error("panel {0:?} is already bound to a leaf")]
    DuplicatePanel(PanelId),
}
