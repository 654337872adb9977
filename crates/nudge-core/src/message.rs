//! Send-payload composition.
//!
//! With a small configured probability the monitor sends a multi-word
//! re-evaluation message instead of the plain confirmation — a
//! non-deterministic escape hatch for breaking repetitive automation
//! loops. The random roll is supplied by the caller so composition stays
//! deterministic under test.

use serde::{Deserialize, Serialize};

use crate::config::SendPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Confirm,
    EscapeMessage,
}

impl PayloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::EscapeMessage => "escape-message",
        }
    }
}

/// Text to inject, Enter always appended by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendPayload {
    pub text: String,
    pub kind: PayloadKind,
}

/// Compose the payload for one send.
///
/// `roll` is a uniform sample from `[0, 1)`. The escape message fires
/// when `roll < escape_chance` and the message is non-empty.
pub fn compose(roll: f64, policy: &SendPolicy) -> SendPayload {
    if !policy.escape_message.is_empty() && roll < policy.escape_chance {
        SendPayload {
            text: policy.escape_message.clone(),
            kind: PayloadKind::EscapeMessage,
        }
    } else {
        SendPayload {
            text: policy.confirm_text.clone(),
            kind: PayloadKind::Confirm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(chance: f64, escape: &str) -> SendPolicy {
        SendPolicy {
            escape_chance: chance,
            escape_message: escape.to_string(),
            ..SendPolicy::default()
        }
    }

    #[test]
    fn roll_below_chance_selects_escape_message() {
        let p = policy(0.1, "step back");
        let payload = compose(0.05, &p);
        assert_eq!(payload.kind, PayloadKind::EscapeMessage);
        assert_eq!(payload.text, "step back");
    }

    #[test]
    fn roll_at_chance_selects_confirm() {
        // Strict less-than: roll == chance is a confirm.
        let p = policy(0.1, "step back");
        let payload = compose(0.1, &p);
        assert_eq!(payload.kind, PayloadKind::Confirm);
        assert_eq!(payload.text, "y");
    }

    #[test]
    fn roll_above_chance_selects_confirm() {
        let p = policy(0.1, "step back");
        assert_eq!(compose(0.9, &p).kind, PayloadKind::Confirm);
    }

    #[test]
    fn zero_chance_never_escapes() {
        let p = policy(0.0, "step back");
        assert_eq!(compose(0.0, &p).kind, PayloadKind::Confirm);
    }

    #[test]
    fn empty_escape_message_disables_the_hatch() {
        let p = policy(1.0, "");
        assert_eq!(compose(0.0, &p).kind, PayloadKind::Confirm);
    }

    #[test]
    fn kind_strings() {
        assert_eq!(PayloadKind::Confirm.as_str(), "confirm");
        assert_eq!(PayloadKind::EscapeMessage.as_str(), "escape-message");
    }
}
