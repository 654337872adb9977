//! Error types for the window backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("window {0:#x} no longer exists")]
    WindowGone(u64),

    #[error("failed to read window text: {0}")]
    ReadFailed(String),

    #[error("keystroke injection failed: {0}")]
    InjectionFailed(String),

    #[error("window automation is not supported on this platform")]
    Unsupported,

    #[error("window io error: {0}")]
    Io(#[from] std::io::Error),
}
