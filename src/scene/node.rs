use std::sync::Arc;

use asset_common::{scene::LoadedMesh, transform::Transform};

use super::SurfaceMaterial;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A transformable entry of the scene graph. What else it can do is decided by its [`NodeKind`].
#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Only groups its children
    Group,
    Mesh(MeshNode),
}

/// A node that draws something.
#[derive(Clone, Debug)]
pub struct MeshNode {
    pub surfaces: Vec<Surface>,
    /// Index into the skins of the owning graph
    pub skin: Option<usize>,
}

/// One drawable piece of geometry together with the material it is drawn with.
#[derive(Clone, Debug)]
pub struct Surface {
    pub mesh: Arc<LoadedMesh>,
    pub material: SurfaceMaterial,
    pub cast_shadow: bool,
}

impl Node {
    pub fn group(name: Option<String>, transform: Transform) -> Self {
        Self {
            name,
            transform,
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Group,
        }
    }

    pub fn mesh(name: Option<String>, transform: Transform, mesh: MeshNode) -> Self {
        Self {
            kind: NodeKind::Mesh(mesh),
            ..Self::group(name, transform)
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The surfaces of this node, if it is something that gets drawn.
    pub fn renderable(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    pub fn renderable_mut(&mut self) -> Option<&mut MeshNode> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }
}
