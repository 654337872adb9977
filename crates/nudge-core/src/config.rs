//! Immutable run configuration.
//!
//! Assembled once at startup from CLI flags (which carry env-var
//! fallbacks), then passed by reference into the monitor. Nothing in
//! here is mutated after construction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::WindowHandle;

/// Default poll interval between monitor ticks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Default staleness threshold before a confirmation is sent.
pub const DEFAULT_STALE_THRESHOLD_SECS: u64 = 15;

/// Default pause after an injection failure before polling resumes.
pub const DEFAULT_ERROR_BACKOFF_SECS: u64 = 60;

/// Default probability of sending the re-evaluation message instead of
/// the plain confirmation.
pub const DEFAULT_ESCAPE_CHANCE: f64 = 0.1;

/// Default confirmation text (a single `y`, followed by Enter).
pub const DEFAULT_CONFIRM_TEXT: &str = "y";

/// Default multi-word message used to break repetitive automation loops.
pub const DEFAULT_ESCAPE_MESSAGE: &str = "Let's take a step back and re-evaluate \
if what we're doing makes sense. We might be getting in a loop here. Let's do \
something a little more out of left field instead.";

/// Default console window class used by the heuristic scan.
pub const DEFAULT_CONSOLE_CLASS: &str = "ConsoleWindowClass";

/// Default elevated-console title prefix used by the heuristic scan.
pub const DEFAULT_ELEVATED_PREFIX: &str = "administrator:";

/// Which window to watch. Matching strategies are tried in priority
/// order by the resolver; see [`crate::resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Pre-selected or configured handle. Always wins when the window
    /// still exists.
    pub handle: Option<WindowHandle>,
    /// Full window title for the anchored title match (and prefix match
    /// in the heuristic scan).
    pub title: Option<String>,
    /// Substring accepted by the heuristic scan.
    pub title_substring: Option<String>,
    /// Window class the heuristic scan filters on.
    pub class_name: String,
    /// Title prefix recognizing elevated console windows.
    pub elevated_prefix: String,
}

impl TargetSpec {
    pub fn new() -> Self {
        Self {
            handle: None,
            title: None,
            title_substring: None,
            class_name: DEFAULT_CONSOLE_CLASS.to_string(),
            elevated_prefix: DEFAULT_ELEVATED_PREFIX.to_string(),
        }
    }
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// When and what to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendPolicy {
    /// Interval between monitor ticks.
    pub poll_interval: Duration,
    /// How long content must stay unchanged before a send fires.
    pub stale_threshold: Duration,
    /// Send every tick regardless of staleness.
    pub persistent: bool,
    /// Single-character confirmation text (Enter is appended on send).
    pub confirm_text: String,
    /// Alternate multi-word message; empty disables the escape hatch.
    pub escape_message: String,
    /// Probability in `[0, 1]` of sending `escape_message` instead of
    /// `confirm_text`.
    pub escape_chance: f64,
    /// Pause after an injection failure before normal-rate polling
    /// resumes.
    pub error_backoff: Duration,
}

impl Default for SendPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            stale_threshold: Duration::from_secs(DEFAULT_STALE_THRESHOLD_SECS),
            persistent: false,
            confirm_text: DEFAULT_CONFIRM_TEXT.to_string(),
            escape_message: DEFAULT_ESCAPE_MESSAGE.to_string(),
            escape_chance: DEFAULT_ESCAPE_CHANCE,
            error_backoff: Duration::from_secs(DEFAULT_ERROR_BACKOFF_SECS),
        }
    }
}

/// Full monitor configuration: target selection plus send policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub target: TargetSpec,
    pub policy: SendPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_spec_defaults_carry_console_heuristics() {
        let spec = TargetSpec::new();
        assert_eq!(spec.class_name, "ConsoleWindowClass");
        assert_eq!(spec.elevated_prefix, "administrator:");
        assert!(spec.handle.is_none());
        assert!(spec.title.is_none());
    }

    #[test]
    fn send_policy_defaults() {
        let policy = SendPolicy::default();
        assert_eq!(policy.poll_interval, Duration::from_secs(3));
        assert_eq!(policy.stale_threshold, Duration::from_secs(15));
        assert!(!policy.persistent);
        assert_eq!(policy.confirm_text, "y");
        assert!((policy.escape_chance - 0.1).abs() < f64::EPSILON);
        assert_eq!(policy.error_backoff, Duration::from_secs(60));
    }

    #[test]
    fn config_serializes() {
        let cfg = MonitorConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        assert!(json.contains("stale_threshold"));
    }
}
