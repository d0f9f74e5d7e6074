//! Error types

use std::io;

use nasdisplay_protocol::FrameError;

/// Errors returned by display operations
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// Operation attempted on a session that is not open, or the session
    /// was closed while the operation waited
    #[error("display closed")]
    Closed,

    /// Probe or write acknowledgment retries exhausted
    #[error("display not responding")]
    NotResponding,

    /// The line accepted fewer bytes than the frame holds
    #[error("frame size mismatch: wrote {written} of {expected} bytes")]
    SizeMismatch { expected: usize, written: usize },

    /// A frame could not be built
    #[error("frame error: {0:?}")]
    Frame(FrameError),

    /// Serial transport failure, passed through unchanged
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

impl From<FrameError> for DisplayError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

/// Errors loading a [`crate::DisplayConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for display operations
pub type Result<T> = std::result::Result<T, DisplayError>;
