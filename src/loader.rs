mod asset;
mod asset_server;
mod asset_source;
mod scene_loader;
mod texture_loader;

pub use asset::*;
pub use asset_server::*;
pub use asset_source::*;
pub use scene_loader::*;
pub use texture_loader::*;
