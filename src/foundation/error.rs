/// Convenience result type used across the compositor.
pub type FrameResult<T> = Result<T, FrameError>;

/// Top-level error taxonomy used by editor APIs.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Invalid configuration or surface/export dimensions.
    #[error("validation error: {0}")]
    Validation(String),

    /// A selected file is not an image (rejected before decoding).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Bytes could not be decoded as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// A rendered surface could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing the wire format.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Failures of the optional upload side channel.
    #[error("upload error: {0}")]
    Upload(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`FrameError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FrameError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`FrameError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`FrameError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
