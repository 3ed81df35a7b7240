use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use tracing::warn;

use crate::common::collections::HashMap;
use crate::layout_engine::{ConflictResolver, Orientation, ResizeError, ResizeRequest};

new_key_type! {
    pub struct ElementId;
}

/// Identifier of the dockable panel a leaf stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeLeaf {
    pub panel: Option<PanelId>,
    pub request: Option<ResizeRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeNode {
    pub orientation: Orientation,
    pub left: ElementId,
    pub right: ElementId,
    /// Combined request of both children, filled in by
    /// [`ResizeTree::prepare_requests`].
    pub request: Option<ResizeRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResizeElement {
    Leaf(ResizeLeaf),
    Node(ResizeNode),
    /// Takes no part in resizing (e.g. an empty slot of the split).
    Passive,
}

impl ResizeElement {
    pub fn request(&self) -> Option<&ResizeRequest> {
        match self {
            ResizeElement::Leaf(leaf) => leaf.request.as_ref(),
            ResizeElement::Node(node) => node.request.as_ref(),
            ResizeElement::Passive => None,
        }
    }

    pub fn as_node(&self) -> Option<&ResizeNode> {
        match self {
            ResizeElement::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// Binary split tree mirroring the divider hierarchy of one dock area.
///
/// Rebuilt by the layout engine for every resize gesture and only read by
/// the resolvers.
#[derive(Debug, Clone, Default)]
pub struct ResizeTree {
    elements: SlotMap<ElementId, ResizeElement>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
    panel_to_leaf: HashMap<PanelId, ElementId>,
}

impl ResizeTree {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    pub fn root(&self) -> Option<ElementId> { self.root }

    pub fn get(&self, id: ElementId) -> Option<&ResizeElement> { self.elements.get(id) }

    pub fn node(&self, id: ElementId) -> Option<&ResizeNode> {
        self.elements.get(id).and_then(ResizeElement::as_node)
    }

    pub fn request_of(&self, id: ElementId) -> Option<&ResizeRequest> {
        self.elements.get(id).and_then(ResizeElement::request)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> { self.parent.get(id).copied() }

    pub fn leaf_for_panel(&self, panel: PanelId) -> Option<ElementId> {
        self.panel_to_leaf.get(&panel).copied()
    }

    pub fn make_leaf(
        &mut self,
        panel: Option<PanelId>,
        request: Option<ResizeRequest>,
    ) -> Result<ElementId, ResizeError> {
        if let Some(panel) = panel {
            if self.panel_to_leaf.contains_key(&panel) {
                return Err(ResizeError::DuplicatePanel(panel));
            }
        }
        let id = self.elements.insert(ResizeElement::Leaf(ResizeLeaf { panel, request }));
        if let Some(panel) = panel {
            self.panel_to_leaf.insert(panel, id);
        }
        Ok(id)
    }

    pub fn make_passive(&mut self) -> ElementId { self.elements.insert(ResizeElement::Passive) }

    pub fn make_node(
        &mut self,
        orientation: Orientation,
        left: ElementId,
        right: ElementId,
    ) -> Result<ElementId, ResizeError> {
        if left == right {
            return Err(ResizeError::DegenerateSplit(left));
        }
        for child in [left, right] {
            self.check_detached(child)?;
        }
        let id = self.elements.insert(ResizeElement::Node(ResizeNode {
            orientation,
            left,
            right,
            request: None,
        }));
        self.parent.insert(left, id);
        self.parent.insert(right, id);
        // Wrapping the current root makes the new split the top of the tree.
        if self.root.is_some_and(|root| root == left || root == right) {
            self.root = Some(id);
        }
        Ok(id)
    }

    pub fn set_root(&mut self, id: ElementId) -> Result<(), ResizeError> {
        self.check_detached(id)?;
        self.root = Some(id);
        Ok(())
    }

    fn check_detached(&self, id: ElementId) -> Result<(), ResizeError> {
        if !self.elements.contains_key(id) {
            return Err(ResizeError::UnknownElement(id));
        }
        if self.parent.contains_key(id) {
            return Err(ResizeError::AlreadyAttached(id));
        }
        Ok(())
    }

    /// Elements reachable from the root, parents before children and left
    /// before right.
    pub fn preorder(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.elements.len());
        let mut stack: Vec<ElementId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(element) = self.elements.get(id) else {
                warn!("Split tree references missing element {:?}", id);
                continue;
            };
            out.push(id);
            if let ResizeElement::Node(node) = element {
                stack.push(node.right);
                stack.push(node.left);
            }
        }
        out
    }

    pub fn collect_panels_under(&self, id: ElementId, out: &mut Vec<PanelId>) {
        match self.elements.get(id) {
            Some(ResizeElement::Leaf(leaf)) => out.extend(leaf.panel),
            Some(ResizeElement::Node(node)) => {
                self.collect_panels_under(node.left, out);
                self.collect_panels_under(node.right, out);
            }
            Some(ResizeElement::Passive) | None => {}
        }
    }

    /// Derives the request of every node from its children, bottom-up.
    ///
    /// Fractions merge towards the stronger opinion. Deltas along the split
    /// axis add up; deltas across it must agree and are settled by `resolver`.
    pub fn prepare_requests<R: ConflictResolver + ?Sized>(&mut self, resolver: &R) {
        if let Some(root) = self.root {
            self.prepare_element(root, resolver);
        }
    }

    fn prepare_element<R: ConflictResolver + ?Sized>(
        &mut self,
        id: ElementId,
        resolver: &R,
    ) -> Option<ResizeRequest> {
        let node = match self.elements.get(id)? {
            ResizeElement::Node(node) => node.clone(),
            other => return other.request().copied(),
        };
        let left = self.prepare_element(node.left, resolver);
        let right = self.prepare_element(node.right, resolver);
        let combined = match (left, right) {
            (None, None) => None,
            (Some(only), None) | (None, Some(only)) => Some(only),
            (Some(left), Some(right)) => Some(self.combine(&node, &left, &right, resolver)),
        };
        if let Some(ResizeElement::Node(stored)) = self.elements.get_mut(id) {
            stored.request = combined;
        }
        combined
    }

    fn combine<R: ConflictResolver + ?Sized>(
        &self,
        node: &ResizeNode,
        left: &ResizeRequest,
        right: &ResizeRequest,
        resolver: &R,
    ) -> ResizeRequest {
        let along = node.orientation;
        let across = along.perpendicular();
        let mut combined = ResizeRequest::new(
            left.width.merge(right.width),
            left.height.merge(right.height),
        );

        let summed = match (left.delta.get(along), right.delta.get(along)) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
        };
        combined.delta.set(along, summed);

        let agreed = match (left.delta.get(across), right.delta.get(across)) {
            (None, None) => None,
            _ => {
                let resolved = resolver.resolve(
                    self,
                    node,
                    across,
                    left,
                    left.delta_along(across),
                    right,
                    right.delta_along(across),
                );
                // Saturates at the i32 bounds; a resolver never leaves the
                // range spanned by the two inputs, so only custom ones can hit it.
                Some(resolved.round() as i32)
            }
        };
        combined.delta.set(across, agreed);
        combined
    }

    pub fn draw_tree(&self) -> String {
        let Some(root) = self.root else {
            return "<empty tree>".to_string();
        };
        let tree = self.ascii_tree(root);
        let mut out = String::new();
        match ascii_tree::write_tree(&mut out, &tree) {
            Ok(()) => out,
            Err(_) => "<unprintable tree>".to_string(),
        }
    }

    fn ascii_tree(&self, id: ElementId) -> ascii_tree::Tree {
        match self.elements.get(id) {
            Some(ResizeElement::Leaf(leaf)) => {
                let panel = match leaf.panel {
                    Some(PanelId(p)) => format!("panel {p}"),
                    None => "anonymous".to_string(),
                };
                ascii_tree::Tree::Leaf(vec![format!(
                    "Leaf {panel} {}",
                    describe(leaf.request.as_ref())
                )])
            }
            Some(ResizeElement::Node(node)) => ascii_tree::Tree::Node(
                format!("Split {:?} {}", node.orientation, describe(node.request.as_ref())),
                vec![self.ascii_tree(node.left), self.ascii_tree(node.right)],
            ),
            Some(ResizeElement::Passive) => ascii_tree::Tree::Leaf(vec!["Passive".to_string()]),
            None => ascii_tree::Tree::Leaf(vec![format!("Missing {id:?}")]),
        }
    }
}

fn describe(request: Option<&ResizeRequest>) -> String {
    fn axis(request: crate::layout_engine::AxisRequest, delta: Option<i32>) -> String {
        let weight = match request.weight() {
            Some(w) => format!("{:.2}", w.get()),
            None => "-".to_string(),
        };
        match delta {
            Some(d) => format!("{weight}({d:+})"),
            None => weight,
        }
    }
    match request {
        None => "[no request]".to_string(),
        Some(r) => format!(
            "[w {} h {}]",
            axis(r.width, r.delta.get(Orientation::Horizontal)),
            axis(r.height, r.delta.get(Orientation::Vertical))
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{
        AxisRequest, DefaultConflictResolver, RequestDimension, TieBreak,
    };

    fn weighted(w: f64, h: f64) -> ResizeRequest {
        ResizeRequest::new(AxisRequest::weighted(w).unwrap(), AxisRequest::weighted(h).unwrap())
    }

    #[test]
    fn rejects_malformed_splits() {
        let mut tree = ResizeTree::new();
        let a = tree.make_leaf(Some(PanelId(1)), None).unwrap();
        let b = tree.make_leaf(Some(PanelId(2)), None).unwrap();

        assert_eq!(
            tree.make_node(Orientation::Horizontal, a, a),
            Err(ResizeError::DegenerateSplit(a))
        );
        assert_eq!(
            tree.make_leaf(Some(PanelId(1)), None),
            Err(ResizeError::DuplicatePanel(PanelId(1)))
        );

        let split = tree.make_node(Orientation::Horizontal, a, b).unwrap();
        let c = tree.make_passive();
        assert_eq!(
            tree.make_node(Orientation::Vertical, a, c),
            Err(ResizeError::AlreadyAttached(a))
        );
        assert_eq!(tree.set_root(b), Err(ResizeError::AlreadyAttached(b)));
        tree.set_root(split).unwrap();

        assert_eq!(tree.parent(a), Some(split));
        assert_eq!(tree.parent(split), None);
        assert_eq!(tree.leaf_for_panel(PanelId(2)), Some(b));
    }

    #[test]
    fn wrapping_the_root_moves_it_up() {
        let mut tree = ResizeTree::new();
        let a = tree.make_leaf(Some(PanelId(1)), None).unwrap();
        let b = tree.make_leaf(Some(PanelId(2)), None).unwrap();
        let inner = tree.make_node(Orientation::Vertical, a, b).unwrap();
        tree.set_root(inner).unwrap();

        let c = tree
            .make_leaf(
                Some(PanelId(3)),
                Some(weighted(0.5, 0.0).with_delta(RequestDimension::new().with_width(20))),
            )
            .unwrap();
        let outer = tree.make_node(Orientation::Horizontal, c, inner).unwrap();

        assert_eq!(tree.root(), Some(outer));
        assert_eq!(tree.parent(inner), Some(outer));
        assert_eq!(tree.preorder(), vec![outer, c, inner, a, b]);
        assert_eq!(tree.set_root(inner), Err(ResizeError::AlreadyAttached(inner)));

        let plan = crate::layout_engine::ResizePlan::compute(
            &tree,
            &crate::layout_engine::ResolverKind::default(),
            &crate::common::config::ResizeSettings::default(),
        );
        assert_eq!(plan.shift_for(outer), Some(20.0));
    }

    #[test]
    fn unknown_element_is_reported() {
        let mut other = ResizeTree::new();
        let _ = other.make_passive();
        let foreign = other.make_passive();
        let mut tree = ResizeTree::new();
        let a = tree.make_passive();
        assert_eq!(
            tree.make_node(Orientation::Vertical, a, foreign),
            Err(ResizeError::UnknownElement(foreign))
        );
    }

    #[test]
    fn preorder_visits_left_before_right() {
        let mut tree = ResizeTree::new();
        let a = tree.make_leaf(Some(PanelId(1)), None).unwrap();
        let b = tree.make_leaf(Some(PanelId(2)), None).unwrap();
        let c = tree.make_leaf(Some(PanelId(3)), None).unwrap();
        let inner = tree.make_node(Orientation::Vertical, b, c).unwrap();
        let root = tree.make_node(Orientation::Horizontal, a, inner).unwrap();
        tree.set_root(root).unwrap();

        assert_eq!(tree.preorder(), vec![root, a, inner, b, c]);

        let mut panels = Vec::new();
        tree.collect_panels_under(root, &mut panels);
        assert_eq!(panels, vec![PanelId(1), PanelId(2), PanelId(3)]);
    }

    #[test]
    fn prepare_merges_children() {
        let mut tree = ResizeTree::new();
        let a = tree
            .make_leaf(
                Some(PanelId(1)),
                Some(weighted(0.5, 0.2).with_delta(RequestDimension::sized(10, 4))),
            )
            .unwrap();
        let b = tree
            .make_leaf(
                Some(PanelId(2)),
                Some(
                    ResizeRequest::new(AxisRequest::Unset, AxisRequest::weighted(0.2).unwrap())
                        .with_delta(RequestDimension::sized(5, 8)),
                ),
            )
            .unwrap();
        let c = tree.make_leaf(Some(PanelId(3)), None).unwrap();
        let inner = tree.make_node(Orientation::Horizontal, a, b).unwrap();
        let root = tree.make_node(Orientation::Vertical, inner, c).unwrap();
        tree.set_root(root).unwrap();

        tree.prepare_requests(&DefaultConflictResolver::new(TieBreak::Mean));

        let inner_request = tree.request_of(inner).copied().unwrap();
        assert_eq!(inner_request.width, AxisRequest::weighted(0.5).unwrap());
        assert_eq!(inner_request.height, AxisRequest::weighted(0.2).unwrap());
        // widths add up, heights are shared and averaged on a tie
        assert_eq!(inner_request.delta, RequestDimension::sized(15, 6));

        // a child without any request leaves the sibling's request untouched
        assert_eq!(tree.request_of(root).copied(), Some(inner_request));
    }

    struct Overshoot;

    impl ConflictResolver for Overshoot {
        fn resolve_horizontal(
            &self,
            _: &ResizeTree,
            _: &ResizeNode,
            _: &ResizeRequest,
            _: f64,
            _: &ResizeRequest,
            _: f64,
        ) -> f64 {
            -1e12
        }

        fn resolve_vertical(
            &self,
            _: &ResizeTree,
            _: &ResizeNode,
            _: &ResizeRequest,
            _: f64,
            _: &ResizeRequest,
            _: f64,
        ) -> f64 {
            1e12
        }
    }

    #[test]
    fn shared_delta_saturates_at_pixel_range() {
        let mut tree = ResizeTree::new();
        let a = tree
            .make_leaf(
                Some(PanelId(1)),
                Some(weighted(0.5, 0.5).with_delta(RequestDimension::sized(1, i32::MAX))),
            )
            .unwrap();
        let b = tree
            .make_leaf(
                Some(PanelId(2)),
                Some(weighted(0.5, 0.5).with_delta(RequestDimension::sized(i32::MAX, 3))),
            )
            .unwrap();
        let root = tree.make_node(Orientation::Horizontal, a, b).unwrap();
        tree.set_root(root).unwrap();

        tree.prepare_requests(&Overshoot);
        let delta = tree.request_of(root).unwrap().delta;
        // widths add up and saturate, heights come from the resolver
        assert_eq!(delta, RequestDimension::sized(i32::MAX, i32::MAX));

        tree.prepare_requests(&DefaultConflictResolver::new(TieBreak::First));
        assert_eq!(tree.request_of(root).unwrap().delta.height(), Ok(i32::MAX));
    }

    #[test]
    fn prepare_without_requests_leaves_nodes_empty() {
        let mut tree = ResizeTree::new();
        let a = tree.make_passive();
        let b = tree.make_leaf(None, None).unwrap();
        let root = tree.make_node(Orientation::Horizontal, a, b).unwrap();
        tree.set_root(root).unwrap();
        tree.prepare_requests(&DefaultConflictResolver::default());
        assert_eq!(tree.request_of(root), None);
    }

    #[test]
    fn draw_tree_lists_every_element() {
        let mut tree = ResizeTree::new();
        assert_eq!(tree.draw_tree(), "<empty tree>");

        let a = tree.make_leaf(Some(PanelId(7)), Some(weighted(1.0, 0.0))).unwrap();
        let b = tree.make_passive();
        let root = tree.make_node(Orientation::Horizontal, a, b).unwrap();
        tree.set_root(root).unwrap();

        let drawn = tree.draw_tree();
        assert!(drawn.contains("Split Horizontal"), "{drawn}");
        assert!(drawn.contains("Leaf panel 7 [w 1.00 h 0.00]"), "{drawn}");
        assert!(drawn.contains("Passive"), "{drawn}");
    }
}
