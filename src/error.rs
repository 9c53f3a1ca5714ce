//! Error types for bookwalk operations.

use thiserror::Error;

/// Errors that can occur while decoding or processing a render context.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or structurally invalid wire bytes.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A failure raised by handler logic while walking a decoded book.
    #[error("processing error: {0}")]
    Processing(String),
}

impl Error {
    /// Build a processing error from any displayable message.
    pub fn processing(msg: impl Into<String>) -> Self {
        Error::Processing(msg.into())
    }

    /// Returns `true` if this error came from decoding wire bytes.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
