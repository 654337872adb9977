//! Monitor loop: resolve the target window, digest its content, and
//! inject a confirmation when the output has gone stale.
//!
//! Each tick is sequential and blocking: enumeration, snapshot read and
//! injection run one after another inside `spawn_blocking`. One status
//! line per tick goes to stdout; diagnostics go through tracing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::time::{Duration, interval};

use nudge_core::config::MonitorConfig;
use nudge_core::digest::ContentDigest;
use nudge_core::message::{PayloadKind, compose};
use nudge_core::resolver::{self, ResolveStrategy};
use nudge_core::staleness::{HoldReason, StalenessState, TickAction, evaluate};
use nudge_window::{WindowBackend, snapshot_text};

/// What one tick did, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No strategy resolved a target; staleness state untouched.
    NoTarget,
    /// Target resolved, no send this tick.
    Held {
        reason: HoldReason,
        elapsed_secs: i64,
        digest: ContentDigest,
    },
    /// Sent a payload.
    Sent {
        action: TickAction,
        kind: PayloadKind,
        strategy: ResolveStrategy,
    },
    /// Injection raised; the loop pauses for the error backoff.
    InjectionFailed { detail: String },
}

/// Run one monitoring tick. At most one keystroke injection occurs.
///
/// `roll` is the uniform sample deciding confirm vs escape message;
/// injected by the caller so ticks stay deterministic under test.
pub fn run_tick<B: WindowBackend>(
    backend: &B,
    cfg: &MonitorConfig,
    state: &StalenessState,
    now: DateTime<Utc>,
    roll: f64,
) -> (StalenessState, TickOutcome) {
    let windows = match backend.enumerate() {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!("window enumeration failed: {e}");
            return (state.clone(), TickOutcome::NoTarget);
        }
    };

    let Some(resolution) = resolver::resolve(&cfg.target, &windows) else {
        return (state.clone(), TickOutcome::NoTarget);
    };
    tracing::debug!(
        "resolved {} via {:?}: {}",
        resolution.window.handle,
        resolution.strategy,
        resolution.reason
    );

    let snapshot = snapshot_text(backend, resolution.window.handle);
    let digest = ContentDigest::of(&snapshot);

    let (next, report) = evaluate(state, digest, now, &cfg.policy);

    match report.action {
        TickAction::Hold(reason) => (
            next,
            TickOutcome::Held {
                reason,
                elapsed_secs: report.elapsed.num_seconds(),
                digest,
            },
        ),
        action => {
            let payload = compose(roll, &cfg.policy);
            match backend.send_keys(resolution.window.handle, &payload.text, true) {
                Ok(()) => (
                    next,
                    TickOutcome::Sent {
                        action,
                        kind: payload.kind,
                        strategy: resolution.strategy,
                    },
                ),
                // Keep the prior state so the send opportunity is not
                // consumed: the same trigger fires again once the
                // backend recovers.
                Err(e) => (
                    state.clone(),
                    TickOutcome::InjectionFailed {
                        detail: e.to_string(),
                    },
                ),
            }
        }
    }
}

/// One stdout line per tick.
pub fn status_line(outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::NoTarget => "no target (skip)".to_string(),
        TickOutcome::Held {
            reason,
            elapsed_secs,
            digest,
        } => match reason {
            HoldReason::Fresh => format!("fresh {elapsed_secs}s [{digest}] (skip)"),
            HoldReason::AlreadySent => format!("stale {elapsed_secs}s [{digest}] already sent (skip)"),
        },
        TickOutcome::Sent { action, kind, .. } => {
            let trigger = match action {
                TickAction::SendInitial => "initial",
                TickAction::SendPersistent => "persistent",
                TickAction::SendStale => "stale",
                TickAction::Hold(_) => unreachable!("hold is not a send"),
            };
            format!("sent {} ({trigger})", kind.as_str())
        }
        TickOutcome::InjectionFailed { detail } => format!("send failed: {detail}"),
    }
}

/// Run the monitor until the stop flag is set.
pub async fn run_monitor<B: WindowBackend + 'static>(
    backend: Arc<B>,
    cfg: MonitorConfig,
    stop: Arc<AtomicBool>,
) {
    let mut ticker = interval(cfg.policy.poll_interval);
    let mut state = StalenessState::new(Utc::now());

    while !stop.load(Ordering::SeqCst) {
        ticker.tick().await;
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let tick_backend = Arc::clone(&backend);
        let tick_cfg = cfg.clone();
        let tick_state = state.clone();
        let roll = rand::thread_rng().r#gen::<f64>();

        let joined = tokio::task::spawn_blocking(move || {
            run_tick(&*tick_backend, &tick_cfg, &tick_state, Utc::now(), roll)
        })
        .await;

        let outcome = match joined {
            Ok((next, outcome)) => {
                state = next;
                outcome
            }
            Err(e) => {
                tracing::error!("tick task panicked: {e}");
                continue;
            }
        };

        println!("{}", status_line(&outcome));

        if let TickOutcome::InjectionFailed { ref detail } = outcome {
            tracing::warn!("injection failed, backing off: {detail}");
            backoff(cfg.policy.error_backoff, &stop).await;
        }
    }

    tracing::info!("monitor stopped");
}

/// Long pause after an injection failure. Checks the stop flag at a
/// short cadence so shutdown is not held up by the backoff.
async fn backoff(total: std::time::Duration, stop: &AtomicBool) {
    let step = Duration::from_millis(250);
    let mut remaining = total;
    while !remaining.is_zero() && !stop.load(Ordering::SeqCst) {
        let slice = remaining.min(step);
        tokio::time::sleep(slice).await;
        remaining -= slice;
    }
}
