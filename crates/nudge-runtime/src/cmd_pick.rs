//! `nudge pick` — interactive target chooser.
//!
//! Prints a numbered list of candidate windows and reads the choice
//! from stdin. The chosen handle becomes the explicit handle for the
//! run, which always wins over title matching.

use std::io::{BufRead, Write};

use nudge_core::config::TargetSpec;
use nudge_core::resolver::matches_heuristic;
use nudge_core::types::{WindowHandle, WindowInfo};
use nudge_window::WindowBackend;

use crate::cmd_ls::format_window_lines;

/// Candidates offered by the chooser: heuristic matches first; when the
/// filter matches nothing, fall back to every titled window so the
/// operator can still pick an unusual target.
pub(crate) fn pick_candidates(spec: &TargetSpec, windows: &[WindowInfo]) -> Vec<WindowInfo> {
    let matching: Vec<WindowInfo> = windows
        .iter()
        .filter(|w| matches_heuristic(spec, w))
        .cloned()
        .collect();
    if !matching.is_empty() {
        return matching;
    }
    windows.iter().filter(|w| !w.title.is_empty()).cloned().collect()
}

/// Parse the operator's selection (1-based index or empty to abort).
pub(crate) fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let n: usize = trimmed.parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Run the chooser. Returns the selected handle, or `None` when the
/// operator aborted.
pub fn choose(
    backend: &impl WindowBackend,
    spec: &TargetSpec,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<Option<WindowHandle>> {
    let windows = backend.enumerate()?;
    let candidates = pick_candidates(spec, &windows);

    if candidates.is_empty() {
        writeln!(output, "no windows to pick from")?;
        return Ok(None);
    }

    for (i, line) in format_window_lines(&candidates).iter().enumerate() {
        writeln!(output, "{:>3}. {line}", i + 1)?;
    }
    write!(output, "target [1-{}, empty aborts]: ", candidates.len())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(parse_choice(&line, candidates.len()).map(|i| candidates[i].handle))
}
