use std::io;
use thiserror::Error;

/// The three failure families a caller can react to.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ErrorKind {
    /// The byte sink or source failed, or the value could not be snapshotted
    /// within the configured limits.
    Ingestion,
    /// The bytes are not a valid encoding.
    Format,
    /// The bytes are valid but describe a different type than requested.
    TypeMismatch,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("ingestion error: {0}")]
    Ingestion(#[from] io::Error),

    #[error("not capturable: {0}")]
    NotCapturable(String),

    /// The value is capturable in principle, but is deeper or longer than
    /// [`CodecConfig`](crate::CodecConfig) allows.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ingestion(_) | Self::NotCapturable(_) | Self::LimitExceeded(_) => {
                ErrorKind::Ingestion
            }
            Self::Format(_) => ErrorKind::Format,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Maps a source failure. Running out of bytes mid-node means the buffer is truncated,
    /// which is a format problem rather than an I/O one.
    pub(crate) fn from_read(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Self::Format(String::from("truncated stream")),
            _ => Self::Ingestion(e),
        }
    }
}
