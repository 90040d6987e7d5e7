use std::sync::Arc;

use anyhow::Context;
use asset_common::{
    scene::{ColorSpace, LoadedImage, LoadedModel},
    AssetRef,
};
use tokio::runtime::Runtime;

use crate::error::AssetLoadError;

use super::{decode_image, AssetHandle, AssetSource, GltfModelLoader};

/// Runs asset fetches and decodes off the frame thread.
///
/// Every request returns an [`AssetHandle`] straight away; the frame loop polls it.
pub struct AssetServer {
    runtime: Option<Runtime>,
    source: Arc<dyn AssetSource>,
}

impl AssetServer {
    pub fn new(source: impl AssetSource + 'static) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(6)
            .thread_name("asset-loader")
            .build()
            .context("Could not start the asset loader runtime")?;

        Ok(Self {
            runtime: Some(runtime),
            source: Arc::new(source),
        })
    }

    pub fn load_image(&self, asset: AssetRef, color_space: ColorSpace) -> AssetHandle<LoadedImage> {
        self.spawn_load(asset, move |asset, bytes| {
            decode_image(asset, &bytes, color_space)
        })
    }

    pub fn load_model(&self, asset: AssetRef) -> AssetHandle<LoadedModel> {
        self.spawn_load(asset, |asset, bytes| {
            GltfModelLoader::new().load_model(asset, &bytes)
        })
    }

    fn spawn_load<T, F>(&self, asset: AssetRef, decode: F) -> AssetHandle<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&AssetRef, Vec<u8>) -> Result<T, AssetLoadError> + Send + 'static,
    {
        let (resolver, handle) = AssetHandle::channel(asset);
        let Some(runtime) = self.runtime.as_ref() else {
            // Dropping the resolver reports the load as abandoned
            return handle;
        };

        let source = self.source.clone();
        runtime.spawn_blocking(move || {
            let asset = resolver.asset().clone();
            log::debug!("Loading asset {}", asset);
            let result = source
                .read(&asset)
                .map_err(|error| AssetLoadError::io(asset.clone(), error))
                .and_then(|bytes| decode(&asset, bytes))
                .map(Arc::new);
            resolver.resolve(result);
        });
        handle
    }
}

impl Drop for AssetServer {
    fn drop(&mut self) {
        // Don't wait for decodes nobody is going to look at
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
