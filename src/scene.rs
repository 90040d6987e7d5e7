mod light;
mod material;
mod node;
mod texture;

pub use light::*;
pub use material::*;
pub use node::*;
pub use texture::*;

use asset_common::{
    scene::{LoadedModel, LoadedSkin},
    transform::Transform,
};
use ultraviolet::Mat4;

/// A node hierarchy stored in an arena and addressed by [`NodeId`].
///
/// There is always a root group. Graphs built from a model keep the model's node indices,
/// so node `i` of the model is `NodeId` `i` here, and the root comes after them.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
    model_nodes: usize,
    skins: Vec<LoadedSkin>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group(Some("root".into()), Transform::default())],
            root: NodeId::new(0),
            model_nodes: 0,
            skins: Vec::new(),
        }
    }

    /// Instantiates a model. Every primitive gets its own material, so that
    /// changing one surface never leaks into another.
    pub fn from_model(model: &LoadedModel, material_ids: &MaterialIdGenerator) -> Self {
        let mut nodes: Vec<Node> = model
            .nodes
            .iter()
            .map(|loaded| {
                if loaded.primitives.is_empty() {
                    return Node::group(loaded.name.clone(), loaded.transform.clone());
                }
                let surfaces = loaded
                    .primitives
                    .iter()
                    .map(|primitive| Surface {
                        mesh: primitive.mesh.clone(),
                        material: SurfaceMaterial::standard(
                            material_ids.next(),
                            &primitive.material,
                        ),
                        cast_shadow: true,
                    })
                    .collect();
                Node::mesh(
                    loaded.name.clone(),
                    loaded.transform.clone(),
                    MeshNode {
                        surfaces,
                        skin: loaded.skin.filter(|&skin| skin < model.skins.len()),
                    },
                )
            })
            .collect();

        // A node can only have one parent. Broken files that claim otherwise keep the first one,
        // and the scene roots are claimed before anything else.
        let root = NodeId::new(nodes.len());
        let mut root_node = Node::group(Some("scene".into()), Transform::default());
        for &top in &model.roots {
            if top >= nodes.len() || nodes[top].parent.is_some() {
                log::warn!("Ignoring invalid scene root {}", top);
                continue;
            }
            nodes[top].parent = Some(root);
            root_node.children.push(NodeId::new(top));
        }
        for (index, loaded) in model.nodes.iter().enumerate() {
            for &child in &loaded.children {
                if child == index || child >= nodes.len() || nodes[child].parent.is_some() {
                    log::warn!("Ignoring invalid child {} of node {}", child, index);
                    continue;
                }
                nodes[child].parent = Some(NodeId::new(index));
                nodes[index].children.push(NodeId::new(child));
            }
        }
        nodes.push(root_node);

        Self {
            nodes,
            root,
            model_nodes: model.nodes.len(),
            skins: model.skins.clone(),
        }
    }

    pub fn add_node(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        if let Some(parent) = self.nodes.get_mut(parent.index()) {
            parent.children.push(id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root.index()]
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        &mut self.nodes[self.root.index()]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Maps a node index of the source model to its node in this graph.
    pub fn model_node(&self, index: usize) -> Option<NodeId> {
        (index < self.model_nodes).then(|| NodeId::new(index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn skins(&self) -> &[LoadedSkin] {
        &self.skins
    }

    /// Depth-first, parents before children, children in order.
    /// Only nodes reachable from the root are visited, each at most once.
    pub fn traverse<'a>(&'a self, mut visitor: impl FnMut(NodeId, &'a Node)) {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            visitor(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    pub fn traverse_mut(&mut self, mut visitor: impl FnMut(NodeId, &mut Node)) {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.index()) else {
                continue;
            };
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            visitor(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// All surfaces in traversal order.
    pub fn surfaces(&self) -> Vec<&Surface> {
        let mut surfaces = Vec::new();
        self.traverse(|_, node| {
            if let Some(mesh) = node.renderable() {
                surfaces.extend(mesh.surfaces.iter());
            }
        });
        surfaces
    }

    /// Model-to-world matrices, indexed by [`NodeId::index`].
    /// Nodes that are not reachable from the root get the identity.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::identity(); self.nodes.len()];
        self.traverse(|id, node| {
            let parent = node
                .parent
                .map(|parent| world[parent.index()])
                .unwrap_or_else(Mat4::identity);
            world[id.index()] = parent * node.transform.to_matrix();
        });
        world
    }

    /// Joint matrices for a skinned mesh, relative to the mesh node.
    pub fn joint_palette(&self, mesh_node: NodeId, skin: usize, world: &[Mat4]) -> Option<Vec<Mat4>> {
        let skin = self.skins.get(skin)?;
        let inverse_mesh = world.get(mesh_node.index())?.inversed();
        let palette = skin
            .joints
            .iter()
            .enumerate()
            .map(|(i, &joint)| {
                let joint_world = self
                    .model_node(joint)
                    .and_then(|id| world.get(id.index()).copied())
                    .unwrap_or_else(Mat4::identity);
                inverse_mesh * joint_world * skin.inverse_bind_matrix(i)
            })
            .collect();
        Some(palette)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use asset_common::scene::{LoadedMaterial, LoadedMesh, LoadedNode, LoadedPrimitive};
    use ultraviolet::{Vec3, Vec4};

    use super::*;

    fn primitive() -> LoadedPrimitive {
        LoadedPrimitive {
            material: Arc::new(LoadedMaterial::default_material()),
            mesh: Arc::new(LoadedMesh::new_uv_sphere(1.0, 4, 3)),
        }
    }

    /// body -> (arm -> hand, helmet)
    fn model() -> LoadedModel {
        let node = |name: &str, children: Vec<usize>, primitives: usize| LoadedNode {
            name: Some(name.into()),
            transform: Transform {
                position: Vec3::new(0.0, 1.0, 0.0),
                ..Default::default()
            },
            children,
            primitives: (0..primitives).map(|_| primitive()).collect(),
            skin: None,
        };
        LoadedModel {
            nodes: vec![
                node("body", vec![1, 3], 2),
                node("arm", vec![2], 0),
                node("hand", vec![], 1),
                node("helmet", vec![], 1),
            ],
            roots: vec![0],
            skins: vec![LoadedSkin {
                name: None,
                joints: vec![1, 2],
                inverse_bind_matrices: vec![],
            }],
            clips: vec![],
        }
    }

    #[test]
    fn model_indices_are_kept() {
        let graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());

        assert_eq!(graph.len(), 5);
        assert_eq!(graph.root(), NodeId::new(4));
        assert_eq!(graph.model_node(2), Some(NodeId::new(2)));
        assert_eq!(graph.model_node(4), None);
        let hand = graph.node(NodeId::new(2)).unwrap();
        assert_eq!(hand.name.as_deref(), Some("hand"));
        assert_eq!(hand.parent(), Some(NodeId::new(1)));
        assert_eq!(graph.root_node().children(), &[NodeId::new(0)]);
    }

    #[test]
    fn traversal_visits_parents_first_in_child_order() {
        let graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());
        let mut order = Vec::new();
        graph.traverse(|id, _| order.push(id.index()));

        assert_eq!(order, vec![4, 0, 1, 2, 3]);
    }

    #[test]
    fn only_mesh_nodes_are_renderable() {
        let graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());

        assert!(graph.node(NodeId::new(1)).unwrap().renderable().is_none());
        assert_eq!(graph.surfaces().len(), 4);
    }

    #[test]
    fn every_surface_gets_its_own_material() {
        let graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());
        let mut ids: Vec<_> = graph.surfaces().iter().map(|s| s.material.id()).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn child_cycles_are_not_followed() {
        let mut broken = model();
        broken.nodes[2].children.push(0);
        broken.nodes[2].children.push(2);
        let graph = SceneGraph::from_model(&broken, &MaterialIdGenerator::new());
        let mut visited = 0;
        graph.traverse(|_, _| visited += 1);

        assert_eq!(visited, 5);
    }

    #[test]
    fn world_transforms_compose_down_the_hierarchy() {
        let mut graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());
        graph.root_node_mut().transform = Transform::from_uniform_scale(0.5);
        let world = graph.world_transforms();

        // root scale, then three nodes each moved up by one
        let hand = world[2] * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((hand.y - 1.5).abs() < 1e-5);
        let helmet = world[3] * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((helmet.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn joint_palette_is_relative_to_the_mesh() {
        let graph = SceneGraph::from_model(&model(), &MaterialIdGenerator::new());
        let world = graph.world_transforms();
        let palette = graph.joint_palette(NodeId::new(0), 0, &world).unwrap();

        assert_eq!(palette.len(), 2);
        let arm = palette[0] * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((arm.y - 1.0).abs() < 1e-5);
        let hand = palette[1] * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((hand.y - 2.0).abs() < 1e-5);
        assert!(graph.joint_palette(NodeId::new(0), 1, &world).is_none());
    }

    #[test]
    fn added_nodes_hang_below_their_parent() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let child = graph.add_node(root, Node::group(Some("child".into()), Transform::default()));

        assert_eq!(graph.root_node().children(), &[child]);
        assert_eq!(graph.node(child).unwrap().parent(), Some(root));
    }
}
