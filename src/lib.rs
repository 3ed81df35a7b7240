//! Resize-conflict resolution for docking split layouts.
//!
//! A split layout describes its divider hierarchy as a [`ResizeTree`], lets
//! panels attach [`ResizeRequest`]s to their leaves and asks a
//! [`ConflictResolver`] (usually through a [`ResizePlan`]) how far each
//! divider should move.
//!
//! [`ResizeTree`]: layout_engine::ResizeTree
//! [`ResizeRequest`]: layout_engine::ResizeRequest
//! [`ConflictResolver`]: layout_engine::ConflictResolver
//! [`ResizePlan`]: layout_engine::ResizePlan

pub mod common;
pub mod layout_engine;
