/// Result alias used across the crate.
pub type TripResult<T> = Result<T, TripError>;

/// Error type for pipeline runs, media handling and the job layer.
///
/// Media errors are absorbed per item by the timeline assembler; the run-fatal kinds are listed
/// by [`TripError::is_run_fatal`].
#[derive(thiserror::Error, Debug)]
pub enum TripError {
    /// The run was refused before any frame work started (for example an empty media list).
    #[error("rejected run: {0}")]
    Rejected(String),

    /// A single media item could not be read or decoded.
    #[error("media error: {0}")]
    Media(String),

    /// The output sink could not be opened.
    #[error("writer open error: {0}")]
    WriterOpen(String),

    /// The output sink failed after it was opened.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Manifest or probe output could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TripError {
    /// Build a [`TripError::Rejected`].
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Build a [`TripError::Media`].
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`TripError::WriterOpen`].
    pub fn writer_open(msg: impl Into<String>) -> Self {
        Self::WriterOpen(msg.into())
    }

    /// Build a [`TripError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TripError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TripError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for the conditions that end a whole run.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::WriterOpen(_) | Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
