mod frame_graph;
mod headless;

pub use frame_graph::*;
pub use headless::*;

/// The rendering backend. It owns every GPU resource; the scene only hands it a
/// [`FrameGraph`] once per frame.
pub trait RenderEngine {
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &FrameGraph<'_>) -> anyhow::Result<()>;
}
