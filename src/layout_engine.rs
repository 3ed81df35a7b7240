mod error;
pub(crate) mod graph;
pub mod request;
pub mod resize;
pub mod resize_tree;
pub mod resolver;

pub use error::ResizeError;
pub use graph::{Orientation, Side};
pub use request::{AxisRequest, RequestDimension, ResizeRequest, Weight};
pub use resize::{DividerShift, ResizePlan, divider_deltas};
pub use resize_tree::{ElementId, PanelId, ResizeElement, ResizeLeaf, ResizeNode, ResizeTree};
pub use resolver::{
    ConflictResolver, DefaultConflictResolver, FullLockConflictResolver, ResolverKind, TieBreak,
    check_full_lock,
};
