use std::sync::Arc;

use asset_common::{
    scene::{LoadedImage, LoadedModel},
    AssetRef,
};
use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use crate::{
    animation::AnimationDriver,
    error::AssetLoadError,
    loader::{AssetHandle, AssetServer},
    scene::{MapSlot, MaterialIdGenerator, SceneGraph, Texture},
};

/// Where the figure and its texture maps come from, and how big it is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSettings {
    pub model: String,
    pub color_map: String,
    pub roughness_map: String,
    pub metalness_map: String,
    pub normal_map: String,
    pub ambient_occlusion_map: String,
    /// Uniform scale of the model root
    pub scale: f32,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            model: "astronaut.glb".to_string(),
            color_map: "textures/gltf_embedded_0.png".to_string(),
            roughness_map: "textures/gltf_embedded_3@channels=R.png".to_string(),
            metalness_map: "textures/gltf_embedded_1@channels=A.png".to_string(),
            normal_map: "textures/gltf_embedded_4.png".to_string(),
            ambient_occlusion_map: "textures/gltf_embedded_5.png".to_string(),
            scale: 0.3,
        }
    }
}

impl FigureSettings {
    pub fn map(&self, slot: MapSlot) -> &str {
        match slot {
            MapSlot::Color => &self.color_map,
            MapSlot::Roughness => &self.roughness_map,
            MapSlot::Metalness => &self.metalness_map,
            MapSlot::Normal => &self.normal_map,
            MapSlot::AmbientOcclusion => &self.ambient_occlusion_map,
        }
    }
}

/// The requests of a mounted figure.
struct FigureAssets {
    model: AssetHandle<LoadedModel>,
    /// In [`MapSlot::ALL`] order
    maps: [AssetHandle<LoadedImage>; 5],
}

/// The resolved model, instantiated into a graph of its own.
struct FigureInstance {
    model: Arc<LoadedModel>,
    graph: SceneGraph,
    /// The maps of the last bind, `None` before the first one
    bound_maps: Option<[Option<Texture>; 5]>,
}

/// A rigged model with five texture maps that plays its first animation clip.
///
/// Nothing is drawn until the model has loaded. The maps are bound onto every surface
/// as they come in; a map that is still loading leaves its slot empty until the next bind.
pub struct AnimatedFigure {
    /// `None` once unmounted
    assets: Option<FigureAssets>,
    scale: f32,
    material_ids: MaterialIdGenerator,
    instance: Option<FigureInstance>,
    driver: Option<AnimationDriver>,
    failure: Option<AssetLoadError>,
    binds: usize,
    drivers_created: usize,
}

impl AnimatedFigure {
    /// Requests the model and all maps at once.
    pub fn mount(
        server: &AssetServer,
        settings: &FigureSettings,
        material_ids: &MaterialIdGenerator,
    ) -> Self {
        let model = server.load_model(AssetRef::from_path(&settings.model));
        let maps = MapSlot::ALL.map(|slot| {
            server.load_image(AssetRef::from_path(settings.map(slot)), slot.color_space())
        });
        Self::from_handles(model, maps, settings.scale, material_ids)
    }

    /// `maps` are in [`MapSlot::ALL`] order.
    pub fn from_handles(
        model: AssetHandle<LoadedModel>,
        maps: [AssetHandle<LoadedImage>; 5],
        scale: f32,
        material_ids: &MaterialIdGenerator,
    ) -> Self {
        Self {
            assets: Some(FigureAssets { model, maps }),
            scale,
            material_ids: material_ids.clone(),
            instance: None,
            driver: None,
            failure: None,
            binds: 0,
            drivers_created: 0,
        }
    }

    /// Picks up loaded assets and binds them. Returns the failure of any of the six assets.
    pub fn update(&mut self) -> Result<(), AssetLoadError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        match self.poll_assets() {
            Ok(()) => Ok(()),
            Err(error) => {
                self.instance = None;
                self.driver = None;
                self.failure = Some(error.clone());
                Err(error)
            }
        }
    }

    fn poll_assets(&mut self) -> Result<(), AssetLoadError> {
        let Some(assets) = self.assets.as_mut() else {
            return Ok(());
        };
        let model = assets.model.poll_ready()?;
        let mut maps: [Option<Texture>; 5] = Default::default();
        for (slot, handle) in MapSlot::ALL.iter().zip(assets.maps.iter_mut()) {
            maps[slot.index()] = handle
                .poll_ready()?
                .map(|image| Texture::new(handle.asset().clone(), image));
        }

        let Some(model) = model else {
            return Ok(());
        };
        let instance = self.instance.get_or_insert_with(|| FigureInstance {
            graph: SceneGraph::from_model(&model, &self.material_ids),
            model,
            bound_maps: None,
        });

        if instance.bound_maps.as_ref() != Some(&maps) {
            bind(&mut instance.graph, &maps, self.scale);
            instance.bound_maps = Some(maps);
            self.binds += 1;
        }
        Ok(())
    }

    /// Runs once per frame. Starts the first clip as soon as the model is there.
    pub fn advance(&mut self, delta_seconds: f32) {
        let Some(instance) = self.instance.as_mut() else {
            return;
        };

        if self.driver.is_none() {
            if let Some(clip) = instance.model.clips.first() {
                log::debug!("Playing clip {:?}", clip.name);
                let mut driver = AnimationDriver::new(&instance.graph, clip.clone());
                driver.action_mut().play();
                self.driver = Some(driver);
                self.drivers_created += 1;
            }
        }
        if let Some(driver) = self.driver.as_mut() {
            driver.update(delta_seconds, &mut instance.graph);
        }
    }

    /// Drops the asset handles, so loads that finish later are thrown away.
    pub fn unmount(&mut self) {
        self.assets = None;
        self.instance = None;
        self.driver = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.assets.is_some()
    }

    pub fn failure(&self) -> Option<&AssetLoadError> {
        self.failure.as_ref()
    }

    /// The graph to draw, once the model has loaded.
    pub fn graph(&self) -> Option<&SceneGraph> {
        self.instance.as_ref().map(|instance| &instance.graph)
    }

    pub fn driver(&self) -> Option<&AnimationDriver> {
        self.driver.as_ref()
    }

    /// How many times the maps have been bound onto the surfaces.
    pub fn binds(&self) -> usize {
        self.binds
    }

    pub fn drivers_created(&self) -> usize {
        self.drivers_created
    }
}

/// Puts the maps on every surface and scales the root. Running it again with the same
/// maps gives the same materials, apart from their versions.
fn bind(graph: &mut SceneGraph, maps: &[Option<Texture>; 5], scale: f32) {
    graph.traverse_mut(|_, node| {
        let Some(mesh) = node.renderable_mut() else {
            return;
        };
        for surface in mesh.surfaces.iter_mut() {
            for slot in MapSlot::ALL {
                surface.material.set_map(slot, maps[slot.index()].clone());
            }
            surface.material.transparent = false;
            surface.material.mark_needs_update();
        }
    });
    graph.root_node_mut().transform.scale = Vec3::broadcast(scale);
}
