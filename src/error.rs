//! Crate-level error types
//!
//! Construction-time failures are fatal: a broken manifest, a missing named
//! asset, or an empty prize list all abort game setup rather than propagate
//! placeholder values into the scene.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Asset loading failed (bad manifest, fetch failure, invalid entry)
    #[error("failed to load asset '{name}': {reason}")]
    AssetLoad { name: String, reason: String },

    /// Lookup-by-name miss after the store reported ready
    #[error("no asset named '{0}' in the store")]
    MissingAsset(String),

    /// The prize table needs at least one label (segment angle divides by it)
    #[error("prize list is empty")]
    EmptyPrizeList,
}

impl GameError {
    pub fn asset_load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
