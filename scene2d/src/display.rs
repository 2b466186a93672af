//! Display list: the visual primitives a scene has placed.
//!
//! Nothing here draws. A renderer (or a test) walks the list and draws each
//! node at its position; scenes only create, move, and remove nodes.

use std::collections::BTreeMap;

use crate::locator::ResolvedPosition;
use crate::math::{Aabb, Vec2};

/// Handle to a node in the display list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// What a node looks like.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    /// Texture by asset key.
    Image { texture: String, alpha: f32 },
    /// Text centered on the node position.
    Text {
        content: String,
        font_size: f32,
        color: [f32; 4],
    },
    /// Rectangle centered on the node position.
    Rect {
        size: Vec2,
        fill: Option<[f32; 4]>,
        stroke: Option<[f32; 4]>,
    },
    Circle { radius: f32, color: [f32; 4] },
}

impl Visual {
    pub fn text(content: impl Into<String>, font_size: f32) -> Self {
        Visual::Text {
            content: content.into(),
            font_size,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn image(texture: impl Into<String>) -> Self {
        Visual::Image {
            texture: texture.into(),
            alpha: 1.0,
        }
    }

    pub fn filled_rect(size: Vec2, color: [f32; 4]) -> Self {
        Visual::Rect {
            size,
            fill: Some(color),
            stroke: None,
        }
    }

    /// Unscaled footprint, centered on the node position.
    ///
    /// Text uses a rough monospace estimate; images have no intrinsic size
    /// here and report zero.
    fn extent(&self) -> Vec2 {
        match self {
            Visual::Image { .. } => Vec2::ZERO,
            Visual::Text {
                content, font_size, ..
            } => Vec2::new(content.chars().count() as f32 * font_size * 0.6, *font_size),
            Visual::Rect { size, .. } => *size,
            Visual::Circle { radius, .. } => Vec2::new(radius * 2.0, radius * 2.0),
        }
    }
}

/// A placed visual.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Object key the node was placed under, if any.
    pub name: Option<String>,
    pub visual: Visual,
    pub position: Vec2,
    pub scale: f32,
    /// Whether the node takes part in [`DisplayList::hit_test`].
    pub interactive: bool,
    pub depth: i32,
}

impl Node {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.visual.extent() * self.scale)
    }
}

/// Ordered collection of nodes for the active scene.
pub struct DisplayList {
    next_id: u32,
    nodes: BTreeMap<NodeId, Node>,
}

impl DisplayList {
    /// Create an empty display list.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            nodes: BTreeMap::new(),
        }
    }

    /// Place a visual at a resolved position (scale defaults to 1).
    pub fn add(&mut self, visual: Visual, at: ResolvedPosition) -> NodeId {
        self.insert(Node {
            name: None,
            visual,
            position: at.point(),
            scale: at.scale_or_one(),
            interactive: false,
            depth: 0,
        })
    }

    /// Place a visual under an object key at a resolved position.
    pub fn place(
        &mut self,
        name: impl Into<String>,
        visual: Visual,
        at: ResolvedPosition,
    ) -> NodeId {
        let id = self.add(visual, at);
        self.set_name(id, name);
        id
    }

    /// Place a named visual at a plain point.
    pub fn add_named(&mut self, name: impl Into<String>, visual: Visual, position: Vec2) -> NodeId {
        self.insert(Node {
            name: Some(name.into()),
            visual,
            position,
            scale: 1.0,
            interactive: false,
            depth: 0,
        })
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Attach an object key to a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = Some(name.into());
        }
    }

    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.interactive = interactive;
        }
    }

    pub fn set_depth(&mut self, id: NodeId, depth: i32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.depth = depth;
        }
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    /// Replace the content of a text node. Other visuals are left alone.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(Node {
            visual: Visual::Text { content, .. },
            ..
        }) = self.nodes.get_mut(&id)
        {
            *content = text.into();
        }
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(&id) {
            Some(Node {
                visual: Visual::Text { content, .. },
                ..
            }) => Some(content.as_str()),
            _ => None,
        }
    }

    /// First node placed under `name`.
    pub fn find(&self, name: &str) -> Option<(NodeId, &Node)> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(&id, n)| (id, n))
    }

    /// All nodes placed under `name`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.name.as_deref() == Some(name))
            .map(|(&id, n)| (id, n))
    }

    /// Topmost interactive node under `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.interactive && n.bounds().contains_point(point))
            .max_by_key(|(id, n)| (n.depth, **id))
            .map(|(&id, _)| id)
    }

    /// Iterate nodes in draw order (depth, then insertion).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        let mut nodes: Vec<_> = self.nodes.iter().map(|(&id, n)| (id, n)).collect();
        nodes.sort_by_key(|(id, n)| (n.depth, *id));
        nodes.into_iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}
