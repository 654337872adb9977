use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ─── Window handle & info ─────────────────────────────────────────

/// Opaque OS-level window handle.
///
/// Stored as the raw handle value so it can cross thread and process
/// boundaries (env var, CLI flag) without carrying platform types.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl FromStr for WindowHandle {
    type Err = NudgeError;

    /// Accepts decimal (`123456`) or hex with `0x` prefix (`0x1E240`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else {
            s.parse::<u64>()
        };
        parsed
            .map(WindowHandle)
            .map_err(|_| NudgeError::InvalidHandle(s.to_string()))
    }
}

/// One top-level window as seen by the enumeration facility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub class_name: String,
    pub pid: u32,
}

// ─── Errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NudgeError {
    #[error("invalid window handle: {0:?}")]
    InvalidHandle(String),

    #[error("invalid title pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
