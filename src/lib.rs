pub mod animation;
pub mod camera;
pub mod components;
pub mod config_loader;
pub mod error;
pub mod input_map;
pub mod loader;
pub mod render;
pub mod scene;
pub mod time;
