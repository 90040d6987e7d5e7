use std::sync::Arc;

use crate::transform::Transform;

use super::{LoadedClip, LoadedMaterial, LoadedMesh, LoadedSkin};

/// A decoded model: a node hierarchy plus the animation clips that drive it.
/// Nodes reference each other by index into `nodes`.
#[derive(Clone, Debug, Default)]
pub struct LoadedModel {
    pub nodes: Vec<LoadedNode>,
    /// The top level nodes of the scene that was picked from the file.
    pub roots: Vec<usize>,
    pub skins: Vec<LoadedSkin>,
    pub clips: Vec<Arc<LoadedClip>>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadedNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub children: Vec<usize>,
    pub primitives: Vec<LoadedPrimitive>,
    pub skin: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct LoadedPrimitive {
    pub material: Arc<LoadedMaterial>,
    pub mesh: Arc<LoadedMesh>,
}

impl LoadedModel {
    pub fn primitive_count(&self) -> usize {
        self.nodes.iter().map(|node| node.primitives.len()).sum()
    }
}
