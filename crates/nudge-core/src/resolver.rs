//! Target-window resolution.
//!
//! Resolution runs fresh on every monitoring tick against the current
//! window enumeration; there is no persistent identity beyond the raw
//! handle. Strategies are tried in priority order and the first one that
//! yields a candidate wins. A miss is a skip-this-tick condition, never
//! an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::TargetSpec;
use crate::types::{NudgeError, WindowInfo};

/// Resolution strategy tier — determines which strategy produced the
/// target. Higher-priority tiers are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ResolveStrategy {
    /// Heuristic scan over class name and title predicates.
    HeuristicScan = 0,
    /// Anchored match of the configured title.
    TitleMatch = 1,
    /// Handle supplied by flag/env or the interactive chooser.
    ExplicitHandle = 2,
}

/// A resolved target for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub window: WindowInfo,
    pub strategy: ResolveStrategy,
    pub reason: String,
}

/// Resolve the target window from the current enumeration.
///
/// Priority (highest to lowest):
/// 1. `ExplicitHandle` — configured handle, if it still exists
/// 2. `TitleMatch` — configured title matched as an anchored prefix
/// 3. `HeuristicScan` — class filter plus title predicate
///
/// Returns `None` when no strategy yields a candidate.
pub fn resolve(spec: &TargetSpec, windows: &[WindowInfo]) -> Option<Resolution> {
    // 1. Explicit handle wins whenever the window is still present.
    if let Some(handle) = spec.handle
        && let Some(w) = windows.iter().find(|w| w.handle == handle)
    {
        return Some(Resolution {
            window: w.clone(),
            strategy: ResolveStrategy::ExplicitHandle,
            reason: format!("handle {handle} present in enumeration"),
        });
    }

    // 2. Anchored title match. The configured title is a literal prefix;
    //    console titles grow suffixes as the running command changes.
    if let Some(ref title) = spec.title
        && !title.is_empty()
    {
        let pattern = anchored_title_pattern(title);
        if let Ok(re) = pattern
            && let Some(w) = windows.iter().find(|w| re.is_match(&w.title))
        {
            return Some(Resolution {
                window: w.clone(),
                strategy: ResolveStrategy::TitleMatch,
                reason: format!("title matched ^{title:?}"),
            });
        }
    }

    // 3. Heuristic scan: class-name filter + title predicate.
    windows
        .iter()
        .find(|w| matches_heuristic(spec, w))
        .map(|w| Resolution {
            window: w.clone(),
            strategy: ResolveStrategy::HeuristicScan,
            reason: format!("class {:?} with recognized title", w.class_name),
        })
}

/// Anchored regex for the configured title, escaped so operator titles
/// containing regex metacharacters stay literal.
pub fn anchored_title_pattern(title: &str) -> Result<Regex, NudgeError> {
    Ok(Regex::new(&format!("^{}", regex::escape(title)))?)
}

/// Heuristic predicate: window class must match, and the title must pass
/// one of three checks (configured-title prefix, configured substring, or
/// the elevated-console prefix). All comparisons are case-insensitive —
/// console titles vary in casing across Windows versions.
pub fn matches_heuristic(spec: &TargetSpec, window: &WindowInfo) -> bool {
    if !window.class_name.eq_ignore_ascii_case(&spec.class_name) {
        return false;
    }

    let title_lower = window.title.to_ascii_lowercase();

    if let Some(ref title) = spec.title
        && !title.is_empty()
        && title_lower.starts_with(&title.to_ascii_lowercase())
    {
        return true;
    }

    if let Some(ref fragment) = spec.title_substring
        && !fragment.is_empty()
        && title_lower.contains(&fragment.to_ascii_lowercase())
    {
        return true;
    }

    // Default heuristic: elevated console windows.
    !spec.elevated_prefix.is_empty()
        && title_lower.starts_with(&spec.elevated_prefix.to_ascii_lowercase())
}
