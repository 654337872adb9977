//! OS window capability surface.
//!
//! The monitor's decision logic only ever talks to the [`WindowBackend`]
//! trait — enumerate windows, read text, send keys — so it can run
//! against a fake in tests. The real implementation lives in [`win32`]
//! and only compiles on Windows.

pub mod backend;
pub mod error;
pub mod snapshot;
#[cfg(windows)]
pub mod win32;

pub use backend::{WindowBackend, platform_backend};
pub use error::WindowError;
pub use snapshot::snapshot_text;
