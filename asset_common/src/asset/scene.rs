mod animation;
mod material;
mod mesh;
mod model;
mod skin;
mod texture;

pub use animation::*;
pub use material::*;
pub use mesh::*;
pub use model::*;
pub use skin::*;
pub use texture::*;
