//! Staleness tracking and the per-tick send decision.
//!
//! The monitor digests each snapshot and feeds it through [`evaluate`],
//! which returns the next tracker state and exactly one action. The
//! caller performs at most one injection per tick — the action is the
//! whole decision.
//!
//! Rules:
//! - A digest change resets the last-change timestamp and clears the
//!   "sent for this stale period" flag.
//! - The first evaluated tick always sends once, before any staleness
//!   check.
//! - Persistent mode sends every tick regardless of staleness.
//! - Otherwise one send fires per stale period, once elapsed time
//!   crosses the threshold.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::SendPolicy;
use crate::digest::ContentDigest;

/// Per-run staleness tracker. Created at monitor start, mutated every
/// tick that resolves a target, discarded at process exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessState {
    /// Digest observed on the previous evaluated tick.
    pub last_digest: Option<ContentDigest>,
    /// When the digest last changed.
    pub last_change: DateTime<Utc>,
    /// Whether a send already fired for the current stale period.
    pub sent_for_period: bool,
    /// Whether the initial send-once has fired.
    pub initial_fired: bool,
}

impl StalenessState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_digest: None,
            last_change: now,
            sent_for_period: false,
            initial_fired: false,
        }
    }
}

/// The single action for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// First evaluated tick — send once before any staleness check.
    SendInitial,
    /// Persistent mode — send every tick.
    SendPersistent,
    /// Content crossed the stale threshold — send once for this period.
    SendStale,
    /// No send this tick.
    Hold(HoldReason),
}

impl TickAction {
    pub fn is_send(self) -> bool {
        !matches!(self, TickAction::Hold(_))
    }
}

/// Why a tick held instead of sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// Elapsed time has not crossed the stale threshold.
    Fresh,
    /// Already sent for the current stale period.
    AlreadySent,
}

/// Output of one evaluation: whether the digest changed plus elapsed
/// time since the last change, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub action: TickAction,
    pub changed: bool,
    pub elapsed: TimeDelta,
}

/// Evaluate one monitoring tick.
///
/// Only called when a target window resolved; a no-target tick must not
/// advance the tracker at all.
pub fn evaluate(
    state: &StalenessState,
    digest: ContentDigest,
    now: DateTime<Utc>,
    policy: &SendPolicy,
) -> (StalenessState, TickReport) {
    let changed = state.last_digest != Some(digest);

    let (last_change, sent_for_period) = if changed {
        (now, false)
    } else {
        (state.last_change, state.sent_for_period)
    };

    let elapsed = now.signed_duration_since(last_change);
    let threshold = TimeDelta::from_std(policy.stale_threshold).unwrap_or(TimeDelta::MAX);

    let (action, sent_for_period) = if !state.initial_fired {
        // First evaluated tick: send once, skip further checks.
        (TickAction::SendInitial, sent_for_period)
    } else if policy.persistent {
        (TickAction::SendPersistent, sent_for_period)
    } else if elapsed >= threshold {
        if sent_for_period {
            (TickAction::Hold(HoldReason::AlreadySent), true)
        } else {
            (TickAction::SendStale, true)
        }
    } else {
        (TickAction::Hold(HoldReason::Fresh), sent_for_period)
    };

    let next = StalenessState {
        last_digest: Some(digest),
        last_change,
        sent_for_period,
        initial_fired: true,
    };

    let report = TickReport {
        action,
        changed,
        elapsed,
    };

    (next, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(stale_secs: u64, persistent: bool) -> SendPolicy {
        SendPolicy {
            stale_threshold: Duration::from_secs(stale_secs),
            persistent,
            ..SendPolicy::default()
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    /// Drive N one-second ticks with a fixed digest, returning the
    /// actions observed.
    fn run_ticks(
        mut state: StalenessState,
        digest: ContentDigest,
        policy: &SendPolicy,
        start_sec: i64,
        count: i64,
    ) -> (StalenessState, Vec<TickAction>) {
        let mut actions = Vec::new();
        for i in 0..count {
            let (next, report) = evaluate(&state, digest, at(start_sec + i), policy);
            actions.push(report.action);
            state = next;
        }
        (state, actions)
    }

    // ── 1. Initial send fires once, before staleness ────────────

    #[test]
    fn first_tick_sends_initial() {
        let state = StalenessState::new(t0());
        let (next, report) = evaluate(&state, ContentDigest::of("a"), t0(), &policy(5, false));
        assert_eq!(report.action, TickAction::SendInitial);
        assert!(next.initial_fired);
        assert!(!next.sent_for_period, "initial send is not a stale send");
    }

    #[test]
    fn initial_fires_even_in_persistent_mode() {
        let state = StalenessState::new(t0());
        let (_, report) = evaluate(&state, ContentDigest::of("a"), t0(), &policy(5, true));
        assert_eq!(report.action, TickAction::SendInitial);
    }

    // ── 2. Unchanged content: one send per stale period ─────────

    #[test]
    fn scenario_threshold_5s_interval_1s_content_never_changes() {
        // Send at tick 0 (initial), again at the first tick where
        // elapsed >= 5s, then silence.
        let policy = policy(5, false);
        let digest = ContentDigest::of("frozen output");
        let state = StalenessState::new(t0());

        let (_, actions) = run_ticks(state, digest, &policy, 0, 10);

        assert_eq!(actions[0], TickAction::SendInitial);
        for action in &actions[1..5] {
            assert_eq!(*action, TickAction::Hold(HoldReason::Fresh));
        }
        assert_eq!(actions[5], TickAction::SendStale, "first tick at elapsed=5s");
        for action in &actions[6..] {
            assert_eq!(*action, TickAction::Hold(HoldReason::AlreadySent));
        }

        let sends = actions.iter().filter(|a| a.is_send()).count();
        assert_eq!(sends, 2, "exactly initial + one stale send");
    }

    #[test]
    fn content_change_opens_a_new_stale_period() {
        let policy = policy(3, false);
        let state = StalenessState::new(t0());

        // Burn the initial send and reach AlreadySent.
        let (state, actions) = run_ticks(state, ContentDigest::of("a"), &policy, 0, 5);
        assert_eq!(actions[3], TickAction::SendStale);
        assert_eq!(actions[4], TickAction::Hold(HoldReason::AlreadySent));

        // Content changes at t=5: timestamp resets, flag clears.
        let (state, report) = evaluate(&state, ContentDigest::of("b"), at(5), &policy);
        assert!(report.changed);
        assert_eq!(report.action, TickAction::Hold(HoldReason::Fresh));
        assert_eq!(report.elapsed, TimeDelta::zero());
        assert!(!state.sent_for_period);

        // New period goes stale independently at t=8.
        let (_, actions) = run_ticks(state, ContentDigest::of("b"), &policy, 6, 3);
        assert_eq!(actions[0], TickAction::Hold(HoldReason::Fresh));
        assert_eq!(actions[1], TickAction::Hold(HoldReason::Fresh));
        assert_eq!(actions[2], TickAction::SendStale);
    }

    // ── 3. Persistent mode sends every tick ─────────────────────

    #[test]
    fn scenario_persistent_sends_every_tick() {
        let policy = policy(5, true);
        let state = StalenessState::new(t0());

        let (_, actions) = run_ticks(state, ContentDigest::of("a"), &policy, 0, 8);
        assert_eq!(actions[0], TickAction::SendInitial);
        for action in &actions[1..] {
            assert_eq!(*action, TickAction::SendPersistent);
        }
    }

    #[test]
    fn persistent_sends_regardless_of_digest_changes() {
        let policy = policy(5, true);
        let mut state = StalenessState::new(t0());
        state.initial_fired = true;

        for (i, text) in ["a", "b", "b", "c"].iter().enumerate() {
            let (next, report) = evaluate(&state, ContentDigest::of(text), at(i as i64), &policy);
            assert_eq!(report.action, TickAction::SendPersistent);
            state = next;
        }
    }

    // ── 4. At most one action per tick ──────────────────────────

    #[test]
    fn exactly_one_action_per_tick() {
        // evaluate returns a single TickAction by construction; this
        // exercises the boundary where initial + persistent + stale all
        // apply on the same tick.
        let policy = policy(0, true);
        let state = StalenessState::new(t0());
        let (_, report) = evaluate(&state, ContentDigest::of("a"), at(10), &policy);
        assert_eq!(report.action, TickAction::SendInitial);
    }

    // ── 5. Threshold boundary ───────────────────────────────────

    #[test]
    fn send_fires_exactly_at_threshold() {
        let policy = policy(5, false);
        let mut state = StalenessState::new(t0());
        state.initial_fired = true;
        state.last_digest = Some(ContentDigest::of("a"));

        let (state, report) = evaluate(&state, ContentDigest::of("a"), at(4), &policy);
        assert_eq!(report.action, TickAction::Hold(HoldReason::Fresh));

        let (_, report) = evaluate(&state, ContentDigest::of("a"), at(5), &policy);
        assert_eq!(report.action, TickAction::SendStale);
        assert_eq!(report.elapsed, TimeDelta::seconds(5));
    }

    #[test]
    fn zero_threshold_sends_every_new_period_once() {
        let policy = policy(0, false);
        let mut state = StalenessState::new(t0());
        state.initial_fired = true;

        let (state, report) = evaluate(&state, ContentDigest::of("a"), at(1), &policy);
        // Digest change resets the period, elapsed=0 >= 0 → send.
        assert_eq!(report.action, TickAction::SendStale);

        let (_, report) = evaluate(&state, ContentDigest::of("a"), at(2), &policy);
        assert_eq!(report.action, TickAction::Hold(HoldReason::AlreadySent));
    }

    // ── 6. Change reporting ─────────────────────────────────────

    #[test]
    fn report_flags_digest_change() {
        let policy = policy(5, false);
        let state = StalenessState::new(t0());

        let (state, report) = evaluate(&state, ContentDigest::of("a"), t0(), &policy);
        assert!(report.changed, "first digest counts as a change");

        let (state, report) = evaluate(&state, ContentDigest::of("a"), at(1), &policy);
        assert!(!report.changed);

        let (_, report) = evaluate(&state, ContentDigest::of("b"), at(2), &policy);
        assert!(report.changed);
    }
}
