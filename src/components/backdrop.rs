use std::sync::Arc;

use asset_common::{
    scene::{ColorSpace, LoadedImage, LoadedMesh},
    transform::Transform,
    AssetRef,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AssetLoadError,
    loader::{AssetHandle, AssetServer},
    scene::{
        MapSlot, MaterialIdGenerator, MeshNode, Node, NodeId, SceneGraph, Surface,
        SurfaceMaterial, Texture,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSettings {
    /// Equirectangular panorama
    pub image: String,
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            image: "space-2638158.jpg".to_string(),
            radius: 100.0,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

/// A panorama on the inside of a sphere around the whole scene.
///
/// Draws nothing until the image is there. A failed image is final.
pub struct BackdropSphere {
    image: Option<AssetHandle<LoadedImage>>,
    graph: SceneGraph,
    sphere: NodeId,
    bound: bool,
    failure: Option<AssetLoadError>,
}

impl BackdropSphere {
    pub fn mount(
        server: &AssetServer,
        settings: &BackdropSettings,
        material_ids: &MaterialIdGenerator,
    ) -> Self {
        let image = server.load_image(AssetRef::from_path(&settings.image), ColorSpace::SRGB);
        Self::from_handle(image, settings, material_ids)
    }

    pub fn from_handle(
        image: AssetHandle<LoadedImage>,
        settings: &BackdropSettings,
        material_ids: &MaterialIdGenerator,
    ) -> Self {
        // The camera sits inside, so the faces have to point inwards
        let mesh = LoadedMesh::new_uv_sphere(
            settings.radius,
            settings.width_segments,
            settings.height_segments,
        )
        .inverted();

        let mut graph = SceneGraph::new();
        let root = graph.root();
        let sphere = graph.add_node(
            root,
            Node::mesh(
                Some("backdrop".into()),
                Transform::default(),
                MeshNode {
                    surfaces: vec![Surface {
                        mesh: Arc::new(mesh),
                        material: SurfaceMaterial::unlit(material_ids.next()),
                        cast_shadow: false,
                    }],
                    skin: None,
                },
            ),
        );

        Self {
            image: Some(image),
            graph,
            sphere,
            bound: false,
            failure: None,
        }
    }

    /// Picks up the image once it has loaded.
    pub fn update(&mut self) -> Result<(), AssetLoadError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let Some(handle) = self.image.as_mut() else {
            return Ok(());
        };

        let image = match handle.poll_ready() {
            Ok(Some(image)) => image,
            Ok(None) => return Ok(()),
            Err(error) => {
                self.failure = Some(error.clone());
                return Err(error);
            }
        };
        if !self.bound {
            let texture = Texture::new(handle.asset().clone(), image);
            if let Some(surface) = self.surface_mut() {
                surface.material.set_map(MapSlot::Color, Some(texture));
                surface.material.mark_needs_update();
            }
            self.bound = true;
        }
        Ok(())
    }

    /// Stops listening for the image. Nothing is drawn afterwards.
    pub fn unmount(&mut self) {
        self.image = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.image.is_some()
    }

    pub fn failure(&self) -> Option<&AssetLoadError> {
        self.failure.as_ref()
    }

    /// The graph to draw, once there is something to draw.
    pub fn graph(&self) -> Option<&SceneGraph> {
        (self.is_mounted() && self.bound && self.failure.is_none()).then_some(&self.graph)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.graph
            .node(self.sphere)
            .and_then(Node::renderable)
            .and_then(|mesh| mesh.surfaces.first())
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.graph
            .node_mut(self.sphere)
            .and_then(Node::renderable_mut)
            .and_then(|mesh| mesh.surfaces.first_mut())
    }
}
