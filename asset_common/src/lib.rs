mod asset;
pub mod gpu;
pub mod transform;

pub use asset::*;
