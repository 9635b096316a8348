use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::{Result, ViewerError};
use crate::math::Color;

/// Process-unique node identifier, assigned when a node is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position plus XYZ Euler orientation (radians), relative to the scene root
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }
}

/// Axis-aligned box centred on the node origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Box geometry with a Lambert material
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub color: Color,
    /// Rotated by the animation step every tick
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Light shining from the node position towards `target`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector from the target towards a light placed at `position`
    pub fn direction(&self, position: Vec3) -> Vec3 {
        (position - self.target).normalize_or_zero()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh(Mesh),
    AmbientLight(AmbientLight),
    DirectionalLight(DirectionalLight),
}

/// Drawable or illuminating scene entity
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, transform: Transform, kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            transform,
            kind,
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: BoxGeometry, color: Color) -> Self {
        Self::new(
            name,
            Transform::default(),
            NodeKind::Mesh(Mesh {
                geometry,
                color,
                animated: false,
            }),
        )
    }

    pub fn ambient_light(name: impl Into<String>, color: Color, intensity: f32) -> Self {
        Self::new(
            name,
            Transform::default(),
            NodeKind::AmbientLight(AmbientLight { color, intensity }),
        )
    }

    pub fn directional_light(
        name: impl Into<String>,
        color: Color,
        intensity: f32,
        position: Vec3,
    ) -> Self {
        Self::new(
            name,
            Transform::at(position),
            NodeKind::DirectionalLight(DirectionalLight {
                color,
                intensity,
                target: Vec3::ZERO,
            }),
        )
    }

    /// Mark a mesh as animated; no effect on lights
    pub fn animated(mut self) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.animated = true;
        }
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_animated(&self) -> bool {
        matches!(&self.kind, NodeKind::Mesh(mesh) if mesh.animated)
    }

    /// Aim a directional light at `target`. Returns false for other node kinds.
    pub fn look_at(&mut self, target: Vec3) -> bool {
        match &mut self.kind {
            NodeKind::DirectionalLight(light) => {
                light.target = target;
                true
            }
            _ => false,
        }
    }
}

/// Ordered, flat collection of nodes. Insertion order is draw order.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    pub background: Color,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            background: Color::BLACK,
        }
    }

    /// Append a node. Adding a node whose id is already present is an error.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        let id = node.id();
        if self.nodes.iter().any(|n| n.id() == id) {
            return Err(ViewerError::DuplicateNode(id));
        }
        self.nodes.push(node);
        Ok(id)
    }

    /// Restartable iterator over all nodes in insertion order
    pub fn all_nodes(&self) -> Nodes<'_> {
        Nodes {
            inner: self.nodes.iter(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn animated_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut().filter(|n| n.is_animated())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Node sequence produced by [`SceneGraph::all_nodes`]
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    inner: std::slice::Iter<'a, Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Nodes<'_> {}
