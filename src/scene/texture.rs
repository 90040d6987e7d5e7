use std::sync::Arc;

use asset_common::{scene::LoadedImage, AssetRef};

/// A decoded image bound into a material slot, remembered together with the asset it came from.
#[derive(Clone, Debug)]
pub struct Texture {
    pub source: AssetRef,
    pub image: Arc<LoadedImage>,
}

impl Texture {
    pub fn new(source: AssetRef, image: Arc<LoadedImage>) -> Self {
        Self { source, image }
    }
}

/// Two textures are the same when they are the same decoded image of the same asset.
impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && Arc::ptr_eq(&self.image, &other.image)
    }
}

impl Eq for Texture {}
