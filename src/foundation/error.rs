/// Convenience result type used across cutplay.
pub type CutplayResult<T> = Result<T, CutplayError>;

/// Top-level error taxonomy used by boundary APIs.
///
/// The playback core itself never fails on configuration, asset, or geometry anomalies; those
/// are logged and degraded. Errors surface only where data enters or leaves the engine.
#[derive(thiserror::Error, Debug)]
pub enum CutplayError {
    /// Invalid user-provided sequence, record, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or sampling a timeline.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rendering or encoding frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors while loading or decoding image assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutplayError {
    /// Build a [`CutplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutplayError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`CutplayError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CutplayError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CutplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
