use std::sync::Arc;

use asset_common::AssetRef;

/// An identified asset could not be fetched or decoded.
/// There is no retry and no fallback: the component that requested it stops rendering.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load asset `{asset}`: {kind}")]
pub struct AssetLoadError {
    pub asset: AssetRef,
    pub kind: AssetLoadErrorKind,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetLoadErrorKind {
    #[error("could not read the file: {0}")]
    Io(Arc<std::io::Error>),
    #[error("could not decode the image: {0}")]
    ImageDecode(Arc<image::ImageError>),
    #[error("could not decode the model: {0}")]
    GltfDecode(Arc<gltf::Error>),
    #[error("the model does not contain a scene")]
    NoScene,
    #[error("primitive {primitive} of mesh {mesh} is invalid: {reason}")]
    InvalidPrimitive {
        mesh: usize,
        primitive: usize,
        reason: &'static str,
    },
    #[error("the loader stopped without producing a result")]
    Abandoned,
}

impl AssetLoadError {
    pub fn new(asset: AssetRef, kind: AssetLoadErrorKind) -> Self {
        Self { asset, kind }
    }

    pub fn io(asset: AssetRef, error: std::io::Error) -> Self {
        Self::new(asset, AssetLoadErrorKind::Io(Arc::new(error)))
    }

    pub fn image(asset: AssetRef, error: image::ImageError) -> Self {
        Self::new(asset, AssetLoadErrorKind::ImageDecode(Arc::new(error)))
    }

    pub fn gltf(asset: AssetRef, error: gltf::Error) -> Self {
        Self::new(asset, AssetLoadErrorKind::GltfDecode(Arc::new(error)))
    }
}
