use std::sync::Arc;

use asset_common::scene::LoadedMesh;
use serde::{Deserialize, Serialize};
use ultraviolet::{Mat4, Vec3};

use crate::{
    camera::Camera,
    scene::{Light, NodeId, SceneGraph, SurfaceMaterial},
};

#[derive(Clone, Debug)]
pub struct CameraView {
    pub view: Mat4,
    pub proj: Mat4,
    pub position: Vec3,
}

impl From<&Camera> for CameraView {
    fn from(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            proj: camera.projection_matrix(),
            position: camera.position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub intensity: f32,
    /// Luminance above which pixels start to glow
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            intensity: 0.7,
            luminance_threshold: 0.9,
            luminance_smoothing: 0.025,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostPass {
    Bloom(BloomSettings),
}

/// One surface to draw, with everything resolved to world space.
#[derive(Clone, Debug)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub mesh: &'a Arc<LoadedMesh>,
    pub material: &'a SurfaceMaterial,
    pub model: Mat4,
    pub normal_matrix: Mat4,
    /// Joint matrices for skinned meshes, relative to `model`
    pub joint_palette: Option<Vec<Mat4>>,
    pub cast_shadow: bool,
}

/// Everything the render engine needs for one frame. Borrows the scene graphs it draws.
#[derive(Clone, Debug)]
pub struct FrameGraph<'a> {
    pub camera: CameraView,
    pub lights: Vec<Light>,
    pub draws: Vec<DrawItem<'a>>,
    pub post: Vec<PostPass>,
}

impl<'a> FrameGraph<'a> {
    pub fn new(camera: CameraView, lights: Vec<Light>, post: Vec<PostPass>) -> Self {
        Self {
            camera,
            lights,
            draws: Vec::new(),
            post,
        }
    }

    /// Adds every surface of a graph, in traversal order.
    pub fn add_scene(&mut self, graph: &'a SceneGraph) {
        let world = graph.world_transforms();
        graph.traverse(|id, node| {
            let Some(mesh_node) = node.renderable() else {
                return;
            };
            let model = world[id.index()];
            let normal_matrix = model.inversed().transposed();
            let joint_palette = mesh_node
                .skin
                .and_then(|skin| graph.joint_palette(id, skin, &world));

            for surface in &mesh_node.surfaces {
                self.draws.push(DrawItem {
                    node: id,
                    mesh: &surface.mesh,
                    material: &surface.material,
                    model,
                    normal_matrix,
                    joint_palette: joint_palette.clone(),
                    cast_shadow: surface.cast_shadow,
                });
            }
        });
    }

    pub fn triangle_count(&self) -> usize {
        self.draws
            .iter()
            .map(|draw| draw.mesh.triangle_count())
            .sum()
    }

    pub fn bloom(&self) -> Option<&BloomSettings> {
        self.post.iter().find_map(|pass| match pass {
            PostPass::Bloom(bloom) => Some(bloom),
        })
    }
}

#[cfg(test)]
mod tests {
    use asset_common::transform::Transform;

    use crate::{
        camera::CameraSettings,
        scene::{MaterialId, MeshNode, Node, Surface},
    };

    use super::*;

    fn graph_with_one_surface() -> SceneGraph {
        let mut graph = SceneGraph::new();
        graph.root_node_mut().transform = Transform::from_uniform_scale(2.0);
        let root = graph.root();
        graph.add_node(
            root,
            Node::mesh(
                Some("ball".into()),
                Transform::default(),
                MeshNode {
                    surfaces: vec![Surface {
                        mesh: Arc::new(LoadedMesh::new_uv_sphere(1.0, 8, 4)),
                        material: SurfaceMaterial::unlit(MaterialId::new(1)),
                        cast_shadow: false,
                    }],
                    skin: None,
                },
            ),
        );
        graph
    }

    #[test]
    fn collects_surfaces_with_world_matrices() {
        let graph = graph_with_one_surface();
        let camera = Camera::new(CameraSettings::default(), 1.0);
        let mut frame = FrameGraph::new(CameraView::from(&camera), Vec::new(), Vec::new());
        frame.add_scene(&graph);

        assert_eq!(frame.draws.len(), 1);
        let draw = &frame.draws[0];
        let point = draw.model * ultraviolet::Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(point, ultraviolet::Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert!(!draw.cast_shadow);
        assert!(draw.joint_palette.is_none());
        assert_eq!(frame.triangle_count(), draw.mesh.triangle_count());
    }

    #[test]
    fn finds_the_bloom_pass() {
        let camera = Camera::new(CameraSettings::default(), 1.0);
        let frame = FrameGraph::new(
            CameraView::from(&camera),
            Vec::new(),
            vec![PostPass::Bloom(BloomSettings::default())],
        );

        assert_eq!(frame.bloom().map(|bloom| bloom.intensity), Some(0.7));
    }
}
