use std::fmt;

use serde::{Deserialize, Serialize};

/// A decoded image, ready to be handed to a renderer.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoadedImage {
    pub dimensions: (u32, u32),
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("dimensions", &self.dimensions)
            .field("format", &self.format)
            .field("color_space", &self.color_space)
            //.field("bytes", &self.bytes) // explicitly omitted
            .finish()
    }
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
/// Texel layout of a decoded image. Everything is expanded to 8 bit RGBA on load.
pub enum ImageFormat {
    R8G8B8A8_UNORM,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ColorSpace {
    Linear,
    SRGB,
}
