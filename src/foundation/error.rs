/// Convenience result type used across Unveil.
pub type UnveilResult<T> = Result<T, UnveilError>;

/// Top-level error taxonomy used by controller APIs.
#[derive(thiserror::Error, Debug)]
pub enum UnveilError {
    /// Invalid user-provided description or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while parsing or matching selectors.
    #[error("selector error: {0}")]
    Selector(String),

    /// Errors while dispatching or resolving transitions.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UnveilError {
    /// Build an [`UnveilError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`UnveilError::Selector`] value.
    pub fn selector(msg: impl Into<String>) -> Self {
        Self::Selector(msg.into())
    }

    /// Build an [`UnveilError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build an [`UnveilError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
