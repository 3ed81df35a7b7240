use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::layout_engine::resize_tree::{ElementId, ResizeElement, ResizeNode, ResizeTree};
use crate::layout_engine::{AxisRequest, Orientation, ResizeRequest, Side};

/// Decides how far a divider moves when the elements on both of its sides
/// ask for different deltas.
///
/// Deltas are expressed in divider coordinates: positive moves the divider
/// right (horizontal splits) or down (vertical splits). Whatever one side
/// gains the other loses, so a single value is returned.
#[enum_dispatch]
pub trait ConflictResolver {
    fn resolve_horizontal(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        left: &ResizeRequest,
        delta_left: f64,
        right: &ResizeRequest,
        delta_right: f64,
    ) -> f64;

    fn resolve_vertical(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        top: &ResizeRequest,
        delta_top: f64,
        bottom: &ResizeRequest,
        delta_bottom: f64,
    ) -> f64;

    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        orientation: Orientation,
        first: &ResizeRequest,
        delta_first: f64,
        second: &ResizeRequest,
        delta_second: f64,
    ) -> f64 {
        match orientation {
            Orientation::Horizontal => {
                self.resolve_horizontal(tree, node, first, delta_first, second, delta_second)
            }
            Orientation::Vertical => {
                self.resolve_vertical(tree, node, first, delta_first, second, delta_second)
            }
        }
    }
}

/// How [`DefaultConflictResolver`] settles two equally weighted requests.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Meet halfway.
    #[default]
    Mean,
    /// Left or top side wins.
    First,
    /// Right or bottom side wins.
    Second,
}

/// Baseline arbitration: the stronger opinion wins, an absent opinion
/// always loses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultConflictResolver {
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl DefaultConflictResolver {
    pub fn new(tie_break: TieBreak) -> Self { Self { tie_break } }

    pub fn arbitrate(
        &self,
        first: AxisRequest,
        delta_first: f64,
        second: AxisRequest,
        delta_second: f64,
    ) -> f64 {
        match (first.weight(), second.weight()) {
            (None, None) => 0.0,
            (Some(_), None) => delta_first,
            (None, Some(_)) => delta_second,
            (Some(a), Some(b)) if a.get() > b.get() => delta_first,
            (Some(a), Some(b)) if b.get() > a.get() => delta_second,
            (Some(_), Some(_)) => match self.tie_break {
                TieBreak::Mean => (delta_first + delta_second) / 2.0,
                TieBreak::First => delta_first,
                TieBreak::Second => delta_second,
            },
        }
    }
}

impl ConflictResolver for DefaultConflictResolver {
    fn resolve_horizontal(
        &self,
        _tree: &ResizeTree,
        _node: &ResizeNode,
        left: &ResizeRequest,
        delta_left: f64,
        right: &ResizeRequest,
        delta_right: f64,
    ) -> f64 {
        self.arbitrate(left.width, delta_left, right.width, delta_right)
    }

    fn resolve_vertical(
        &self,
        _tree: &ResizeTree,
        _node: &ResizeNode,
        top: &ResizeRequest,
        delta_top: f64,
        bottom: &ResizeRequest,
        delta_bottom: f64,
    ) -> f64 {
        self.arbitrate(top.height, delta_top, bottom.height, delta_bottom)
    }
}

/// Breaks the tie between two full-weight requests in favour of the side
/// whose whole subtree has an opinion on the axis.
///
/// Everything else is delegated to the wrapped [`DefaultConflictResolver`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullLockConflictResolver {
    #[serde(default)]
    pub fallback: DefaultConflictResolver,
}

impl FullLockConflictResolver {
    pub fn new(fallback: DefaultConflictResolver) -> Self { Self { fallback } }

    pub fn check_horizontal_full_lock(&self, tree: &ResizeTree, element: ElementId) -> bool {
        check_full_lock(tree, element, Orientation::Horizontal)
    }

    pub fn check_vertical_full_lock(&self, tree: &ResizeTree, element: ElementId) -> bool {
        check_full_lock(tree, element, Orientation::Vertical)
    }

    /// The side that wins a full-weight tie, if exactly one side is locked.
    pub fn locked_side(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        orientation: Orientation,
    ) -> Option<Side> {
        let first = check_full_lock(tree, node.left, orientation);
        let second = check_full_lock(tree, node.right, orientation);
        match (first, second) {
            (true, false) => Some(Side::First),
            (false, true) => Some(Side::Second),
            _ => None,
        }
    }

    fn resolve_axis(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        orientation: Orientation,
        (first, delta_first): (&ResizeRequest, f64),
        (second, delta_second): (&ResizeRequest, f64),
    ) -> f64 {
        let (a, b) = (first.fraction(orientation), second.fraction(orientation));
        if a.is_full() && b.is_full() {
            match self.locked_side(tree, node, orientation) {
                Some(Side::First) => {
                    trace!(?orientation, delta_first, "first side fully locked");
                    return delta_first;
                }
                Some(Side::Second) => {
                    trace!(?orientation, delta_second, "second side fully locked");
                    return delta_second;
                }
                None => trace!(?orientation, "full lock undecided, using fallback"),
            }
        }
        self.fallback.arbitrate(a, delta_first, b, delta_second)
    }
}

impl ConflictResolver for FullLockConflictResolver {
    fn resolve_horizontal(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        left: &ResizeRequest,
        delta_left: f64,
        right: &ResizeRequest,
        delta_right: f64,
    ) -> f64 {
        self.resolve_axis(
            tree,
            node,
            Orientation::Horizontal,
            (left, delta_left),
            (right, delta_right),
        )
    }

    fn resolve_vertical(
        &self,
        tree: &ResizeTree,
        node: &ResizeNode,
        top: &ResizeRequest,
        delta_top: f64,
        bottom: &ResizeRequest,
        delta_bottom: f64,
    ) -> f64 {
        self.resolve_axis(
            tree,
            node,
            Orientation::Vertical,
            (top, delta_top),
            (bottom, delta_bottom),
        )
    }
}

/// Whether every element below `element` has an opinion along `orientation`.
///
/// Nodes check their children's own requests one level down and then recurse
/// into them as well. Passive and missing elements are vacuously locked.
pub fn check_full_lock(tree: &ResizeTree, element: ElementId, orientation: Orientation) -> bool {
    let is_set = |request: Option<&ResizeRequest>| {
        request.is_some_and(|r| r.fraction(orientation).is_set())
    };
    match tree.get(element) {
        Some(ResizeElement::Leaf(leaf)) => is_set(leaf.request.as_ref()),
        Some(ResizeElement::Node(node)) => {
            is_set(tree.request_of(node.left))
                && is_set(tree.request_of(node.right))
                && check_full_lock(tree, node.left, orientation)
                && check_full_lock(tree, node.right, orientation)
        }
        Some(ResizeElement::Passive) | None => true,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[enum_dispatch(ConflictResolver)]
pub enum ResolverKind {
    Default(DefaultConflictResolver),
    FullLock(FullLockConflictResolver),
}

impl Default for ResolverKind {
    fn default() -> Self { ResolverKind::FullLock(FullLockConflictResolver::default()) }
}
