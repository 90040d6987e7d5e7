use anyhow::Context;
use astronaut_float::{
    components::SceneHost,
    config_loader::{ConfigFileLoader, SceneConfig},
    input_map::InputMap,
    loader::{AssetServer, FileSource},
    render::{HeadlessEngine, RenderEngine},
    time::Time,
};
use env_logger::Env;
use ultraviolet::Vec2;
use winit::dpi::{self, PhysicalSize};
use winit::event::{
    DeviceEvent, ElementState, Event, KeyboardInput, MouseScrollDelta, VirtualKeyCode,
    WindowEvent,
};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// Pixels of touchpad scrolling that count as one line of a mouse wheel
const PIXELS_PER_LINE: f32 = 50.0;

// Rust will drop these fields in the order they are declared
struct AstronautApp {
    host: SceneHost,
    engine: HeadlessEngine,
    input_map: InputMap,
    time: Time,
    _asset_server: AssetServer,

    /// Application window
    window: Window,
}

impl AstronautApp {
    pub fn new(event_loop: &EventLoop<()>, config: &SceneConfig) -> anyhow::Result<Self> {
        let window = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(dpi::LogicalSize {
                width: config.window.width,
                height: config.window.height,
            })
            .build(event_loop)
            .context("Could not create window")?;
        let PhysicalSize { width, height } = window.inner_size();

        let asset_server = AssetServer::new(FileSource::new(&config.asset_root))?;
        let mut host = SceneHost::new(config, width.max(1) as f32 / height.max(1) as f32);
        host.mount(&asset_server);

        Ok(Self {
            host,
            engine: HeadlessEngine::new(width, height),
            input_map: InputMap::new(),
            time: Time::new(),
            _asset_server: asset_server,
            window,
        })
    }

    pub fn main_loop(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, _, control_flow| {
            control_flow.set_poll();

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        self.host.unmount();
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(PhysicalSize { width, height }) => {
                        self.host.resize(width, height);
                        self.engine.resize(width, height);
                    }
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode,
                                state,
                                ..
                            },
                        ..
                    } => {
                        if virtual_keycode == Some(VirtualKeyCode::Escape)
                            && state == ElementState::Pressed
                        {
                            self.host.unmount();
                            control_flow.set_exit();
                        }
                    }
                    WindowEvent::MouseInput { button, state, .. } => match state {
                        ElementState::Pressed => self.input_map.update_mouse_press(button),
                        ElementState::Released => self.input_map.update_mouse_release(button),
                    },
                    WindowEvent::MouseWheel { delta, .. } => {
                        let lines = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(position) => {
                                position.y as f32 / PIXELS_PER_LINE
                            }
                        };
                        self.input_map.accumulate_scroll_delta(lines);
                    }
                    _ => {}
                },
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                    ..
                } => {
                    self.input_map
                        .accumulate_mouse_delta(Vec2::new(dx as f32, dy as f32));
                }
                Event::MainEventsCleared => {
                    self.window.request_redraw();
                }
                Event::RedrawRequested(_window_id) => {
                    if let Err(error) = self.draw_frame() {
                        log::error!("Rendering failed: {:?}", error);
                        control_flow.set_exit();
                    }
                }
                _ => (),
            }
        });
    }

    fn draw_frame(&mut self) -> anyhow::Result<()> {
        self.time.update();
        self.host.handle_input(&self.input_map);
        self.input_map.clear_frame_deltas();

        let frame = self.host.frame(self.time.delta_seconds());
        self.engine.render(&frame)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut config_loader = ConfigFileLoader::new("scene-config.json");
    let config = config_loader.load_config()?.clone();

    let event_loop = EventLoop::new();
    let app = AstronautApp::new(&event_loop, &config)?;
    app.main_loop(event_loop)
}
