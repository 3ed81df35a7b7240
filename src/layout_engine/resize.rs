use tracing::debug;

use crate::common::config::ResizeSettings;
use crate::layout_engine::resize_tree::{ElementId, ResizeElement, ResizeTree};
use crate::layout_engine::{ConflictResolver, Orientation, ResizeRequest};

/// Movement of one divider produced by a resize pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerShift {
    pub node: ElementId,
    pub orientation: Orientation,
    /// Pixels the divider moves; positive is right or down.
    pub delta: f64,
}

/// Divider movements for one resize gesture.
///
/// The plan only decides how far dividers move. Applying the shifts to real
/// bounds is up to the split layout that built the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizePlan {
    shifts: Vec<DividerShift>,
}

impl ResizePlan {
    pub fn compute<R: ConflictResolver + ?Sized>(
        tree: &ResizeTree,
        resolver: &R,
        settings: &ResizeSettings,
    ) -> ResizePlan {
        let mut prepared = tree.clone();
        prepared.prepare_requests(resolver);

        let mut shifts = Vec::new();
        for id in prepared.preorder() {
            let Some(ResizeElement::Node(node)) = prepared.get(id) else {
                continue;
            };
            let orientation = node.orientation;
            let first = prepared.request_of(node.left).copied().unwrap_or_default();
            let second = prepared.request_of(node.right).copied().unwrap_or_default();
            let (delta_first, delta_second) = divider_deltas(orientation, &first, &second);
            let delta = resolver.resolve(
                &prepared,
                node,
                orientation,
                &first,
                delta_first,
                &second,
                delta_second,
            );
            if delta.abs() < settings.min_divider_delta || delta == 0.0 {
                debug!(?id, delta, "Skipping negligible divider shift");
                continue;
            }
            shifts.push(DividerShift {
                node: id,
                orientation,
                delta,
            });
        }
        debug!("Resize plan moves {} of {} elements", shifts.len(), prepared.len());
        ResizePlan { shifts }
    }

    pub fn shifts(&self) -> &[DividerShift] { &self.shifts }

    pub fn shift_for(&self, node: ElementId) -> Option<f64> {
        self.shifts.iter().find(|s| s.node == node).map(|s| s.delta)
    }

    pub fn is_empty(&self) -> bool { self.shifts.is_empty() }
}

/// Growth requests of both sides in divider coordinates: the first side
/// grows by pushing the divider forward, the second by pulling it back.
pub fn divider_deltas(
    orientation: Orientation,
    first: &ResizeRequest,
    second: &ResizeRequest,
) -> (f64, f64) {
    (first.delta_along(orientation), -second.delta_along(orientation))
}
