use crate::{
    camera::{orbit_controller::OrbitController, Camera},
    config_loader::SceneConfig,
    error::AssetLoadError,
    input_map::InputMap,
    loader::AssetServer,
    render::{BloomSettings, CameraView, FrameGraph, PostPass},
    scene::{LightSettings, MaterialIdGenerator},
};

use super::{AnimatedFigure, BackdropSettings, BackdropSphere, FigureSettings};

/// Owns the camera, the lights, the orbit controls and the post processing chain,
/// and puts a backdrop and a figure in front of them.
///
/// [`SceneHost::frame`] is the only place where time moves forward.
pub struct SceneHost {
    camera: Camera,
    controls: OrbitController,
    lights: LightSettings,
    bloom: BloomSettings,
    figure_settings: FigureSettings,
    backdrop_settings: BackdropSettings,
    material_ids: MaterialIdGenerator,
    backdrop: Option<BackdropSphere>,
    figure: Option<AnimatedFigure>,
    failures: Vec<AssetLoadError>,
}

impl SceneHost {
    pub fn new(config: &SceneConfig, aspect_ratio: f32) -> Self {
        let camera = Camera::new(config.camera.clone(), aspect_ratio);
        let controls =
            OrbitController::new(camera.position, camera.target, config.controls.clone());
        Self {
            camera,
            controls,
            lights: config.lights.clone(),
            bloom: config.bloom.clone(),
            figure_settings: config.figure.clone(),
            backdrop_settings: config.backdrop.clone(),
            material_ids: MaterialIdGenerator::new(),
            backdrop: None,
            figure: None,
            failures: Vec::new(),
        }
    }

    /// Starts loading both children.
    pub fn mount(&mut self, server: &AssetServer) {
        let backdrop =
            BackdropSphere::mount(server, &self.backdrop_settings, &self.material_ids);
        let figure = AnimatedFigure::mount(server, &self.figure_settings, &self.material_ids);
        self.mount_children(backdrop, figure);
    }

    pub fn mount_children(&mut self, backdrop: BackdropSphere, figure: AnimatedFigure) {
        log::info!("Mounting the backdrop and the figure");
        self.backdrop = Some(backdrop);
        self.figure = Some(figure);
        self.failures.clear();
    }

    pub fn unmount(&mut self) {
        log::info!("Unmounting the scene");
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.unmount();
        }
        if let Some(figure) = self.figure.as_mut() {
            figure.unmount();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width, height);
    }

    pub fn handle_input(&mut self, input_map: &InputMap) {
        self.controls.update(input_map);
        self.camera.update_camera(&self.controls);
    }

    /// Runs one frame: picks up loaded assets, moves the animation forward by `delta_seconds`
    /// and collects everything there is to draw.
    ///
    /// A child whose assets failed to load is left out. The other one carries on.
    pub fn frame(&mut self, delta_seconds: f32) -> FrameGraph<'_> {
        let backdrop_result = self.backdrop.as_mut().map(BackdropSphere::update);
        let figure_result = self.figure.as_mut().map(AnimatedFigure::update);
        for result in [backdrop_result, figure_result].into_iter().flatten() {
            if let Err(error) = result {
                self.record_failure(error);
            }
        }
        if let Some(figure) = self.figure.as_mut() {
            figure.advance(delta_seconds);
        }

        let mut frame = FrameGraph::new(
            CameraView::from(&self.camera),
            self.lights.lights(),
            vec![PostPass::Bloom(self.bloom.clone())],
        );
        if let Some(graph) = self.backdrop.as_ref().and_then(BackdropSphere::graph) {
            frame.add_scene(graph);
        }
        if let Some(graph) = self.figure.as_ref().and_then(AnimatedFigure::graph) {
            frame.add_scene(graph);
        }
        frame
    }

    fn record_failure(&mut self, error: AssetLoadError) {
        if self.failures.iter().any(|known| known.asset == error.asset) {
            return;
        }
        log::error!("{}", error);
        self.failures.push(error);
    }

    /// Every asset that failed to load, in the order it was noticed.
    pub fn failures(&self) -> &[AssetLoadError] {
        &self.failures
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn material_ids(&self) -> &MaterialIdGenerator {
        &self.material_ids
    }

    pub fn backdrop(&self) -> Option<&BackdropSphere> {
        self.backdrop.as_ref()
    }

    pub fn figure(&self) -> Option<&AnimatedFigure> {
        self.figure.as_ref()
    }
}
