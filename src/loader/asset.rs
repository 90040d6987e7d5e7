use std::sync::Arc;

use asset_common::AssetRef;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::error::{AssetLoadError, AssetLoadErrorKind};

type LoadResult<T> = Result<Arc<T>, AssetLoadError>;

/// Where an asynchronously requested asset currently stands.
/// Moves out of `Pending` exactly once and never changes afterwards.
#[derive(Debug)]
pub enum AssetState<T> {
    Pending,
    Ready(Arc<T>),
    Failed(AssetLoadError),
}

/// The requesting side of an asset load.
///
/// Owned by the component that asked for the asset. Dropping it closes the channel,
/// so a load that finishes afterwards has nobody to report to and is discarded.
#[derive(Debug)]
pub struct AssetHandle<T> {
    asset: AssetRef,
    state: AssetState<T>,
    receiver: Option<oneshot::Receiver<LoadResult<T>>>,
}

/// The loading side of an asset load. Consumed by [`AssetResolver::resolve`].
#[derive(Debug)]
pub struct AssetResolver<T> {
    asset: AssetRef,
    sender: oneshot::Sender<LoadResult<T>>,
}

impl<T> AssetHandle<T> {
    pub fn channel(asset: AssetRef) -> (AssetResolver<T>, AssetHandle<T>) {
        let (sender, receiver) = oneshot::channel();
        let resolver = AssetResolver {
            asset: asset.clone(),
            sender,
        };
        let handle = AssetHandle {
            asset,
            state: AssetState::Pending,
            receiver: Some(receiver),
        };
        (resolver, handle)
    }

    pub fn ready(asset: AssetRef, value: Arc<T>) -> Self {
        Self {
            asset,
            state: AssetState::Ready(value),
            receiver: None,
        }
    }

    pub fn failed(error: AssetLoadError) -> Self {
        Self {
            asset: error.asset.clone(),
            state: AssetState::Failed(error),
            receiver: None,
        }
    }

    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// Checks for a result without blocking.
    pub fn poll(&mut self) -> &AssetState<T> {
        if let Some(receiver) = self.receiver.as_mut() {
            match receiver.try_recv() {
                Ok(Ok(value)) => {
                    log::info!("Loaded asset {}", self.asset);
                    self.state = AssetState::Ready(value);
                    self.receiver = None;
                }
                Ok(Err(error)) => {
                    self.state = AssetState::Failed(error);
                    self.receiver = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    self.state = AssetState::Failed(AssetLoadError::new(
                        self.asset.clone(),
                        AssetLoadErrorKind::Abandoned,
                    ));
                    self.receiver = None;
                }
            }
        }
        &self.state
    }

    /// Like [`AssetHandle::poll`], but hands out the value. A failure is returned on every call.
    pub fn poll_ready(&mut self) -> Result<Option<Arc<T>>, AssetLoadError> {
        match self.poll() {
            AssetState::Pending => Ok(None),
            AssetState::Ready(value) => Ok(Some(value.clone())),
            AssetState::Failed(error) => Err(error.clone()),
        }
    }

    pub fn state(&self) -> &AssetState<T> {
        &self.state
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        match &self.state {
            AssetState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AssetLoadError> {
        match &self.state {
            AssetState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AssetState::Pending)
    }
}

impl<T> AssetResolver<T> {
    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// Hands the result to the handle. Returns `false` when the handle is gone,
    /// in which case the result is dropped on the spot.
    pub fn resolve(self, result: LoadResult<T>) -> bool {
        match self.sender.send(result) {
            Ok(()) => true,
            Err(_) => {
                log::debug!(
                    "Discarding the result for {}, its requester is gone",
                    self.asset
                );
                false
            }
        }
    }
}
