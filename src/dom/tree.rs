use crate::{
    animation::spec::VisualState,
    foundation::core::{NodeId, Rect},
};

struct ElementNode {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    style: VisualState,
    will_change: bool,
    rect: Rect,
}

/// Minimal retained element tree used as the reference host.
///
/// Nodes carry a tag, optional id, classes, a layout rectangle (set by the
/// host, read by visibility evaluation), an inline visual state, and a
/// compositor-promotion flag. Node ids are indices into the tree's arena
/// and stay valid for the tree's lifetime.
pub struct ElementTree {
    nodes: Vec<ElementNode>,
}

impl ElementTree {
    /// Create a tree with a single root element.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![ElementNode {
                tag: root_tag.to_string(),
                id: None,
                classes: Vec::new(),
                parent: None,
                children: Vec::new(),
                style: VisualState::default(),
                will_change: false,
                rect: Rect::ZERO,
            }],
        }
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child element under `parent` and return its id.
    pub fn append_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ElementNode {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
            style: VisualState::default(),
            will_change: false,
            rect: Rect::ZERO,
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Set the element's id attribute.
    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0 as usize].id = Some(id.to_string());
    }

    /// Add a class to the element.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0 as usize].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Set the element's layout rectangle.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0 as usize].rect = rect;
    }

    /// The element's layout rectangle.
    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes[node.0 as usize].rect
    }

    /// The element's tag name.
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0 as usize].tag
    }

    /// The element's id attribute, if set.
    pub fn id_attr(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0 as usize].id.as_deref()
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0 as usize].classes.iter().any(|c| c == class)
    }

    /// The element's parent, if any.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0 as usize].parent
    }

    /// The element's children in document order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0 as usize].children
    }

    /// Every descendant of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// The element's current inline visual state.
    pub fn style(&self, node: NodeId) -> &VisualState {
        &self.nodes[node.0 as usize].style
    }

    /// Merge `state` over the element's inline visual state.
    pub fn apply_style(&mut self, node: NodeId, state: &VisualState) {
        self.nodes[node.0 as usize].style.merge(state);
    }

    /// Set or clear the compositor-promotion hint.
    pub fn set_will_change(&mut self, node: NodeId, on: bool) {
        self.nodes[node.0 as usize].will_change = on;
    }

    /// Whether the compositor-promotion hint is set.
    pub fn will_change(&self, node: NodeId) -> bool {
        self.nodes[node.0 as usize].will_change
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no elements. Always false: the root element
    /// exists for the tree's lifetime.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
