use crate::engine::transport::path::TransportKind;
use thiserror::Error;

/// Recoverable failures raised while building or running the map scene.
///
/// None of these stop the app: callers log them and degrade the affected
/// marker, flight or asset.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    #[error("landmark '{id}' cannot be placed on the map: {reason}")]
    MissingGeometry { id: String, reason: &'static str },

    #[error("failed to load model '{uri}': {reason}")]
    AssetLoad { uri: String, reason: String },

    #[error("{kind} animation requested before its vehicle model finished loading")]
    AnimatorNotReady { kind: TransportKind },

    #[error("model '{uri}' resolved after its marker released it, discarding")]
    StaleResource { uri: String },

    #[error("landmark record #{index} rejected: {reason}")]
    InvalidLandmark { index: usize, reason: String },
}
