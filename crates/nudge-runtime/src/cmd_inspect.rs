//! `nudge inspect` — dump matching windows for debugging.
//!
//! Shows what the resolver would pick plus a text preview of every
//! window the heuristic filter accepts, so an operator can check that
//! the snapshot read actually sees the console content.

use nudge_core::config::TargetSpec;
use nudge_core::resolver::{self, matches_heuristic};
use nudge_window::{WindowBackend, snapshot_text};

/// Lines of preview text shown per window.
const PREVIEW_LINES: usize = 20;

pub(crate) fn preview(snapshot: &str) -> String {
    let lines: Vec<&str> = snapshot.lines().collect();
    let tail = if lines.len() > PREVIEW_LINES {
        &lines[lines.len() - PREVIEW_LINES..]
    } else {
        &lines[..]
    };
    tail.join("\n")
}

/// Entry point for `nudge inspect`.
pub fn cmd_inspect(backend: &impl WindowBackend, spec: &TargetSpec) -> anyhow::Result<()> {
    let windows = backend.enumerate()?;

    match resolver::resolve(spec, &windows) {
        Some(r) => println!(
            "would resolve: {} {:?} via {:?} ({})",
            r.window.handle, r.window.title, r.strategy, r.reason
        ),
        None => println!("would resolve: none"),
    }

    let matching: Vec<_> = windows
        .iter()
        .filter(|w| matches_heuristic(spec, w))
        .collect();
    if matching.is_empty() {
        eprintln!("no matching windows");
        return Ok(());
    }

    for w in matching {
        println!();
        println!("{}  pid {}  class {:?}", w.handle, w.pid, w.class_name);
        println!("title: {:?}", w.title);
        let snapshot = snapshot_text(backend, w.handle);
        if snapshot.is_empty() {
            println!("(no readable text)");
        } else {
            println!("--- last {PREVIEW_LINES} lines ---");
            println!("{}", preview(&snapshot));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_snapshots_whole() {
        assert_eq!(preview("a\nb"), "a\nb");
    }

    #[test]
    fn preview_takes_the_tail_of_long_snapshots() {
        let snapshot: String = (0..50)
            .map(|i| format!("line {i}\n"))
            .collect::<String>();
        let p = preview(&snapshot);
        assert_eq!(p.lines().count(), PREVIEW_LINES);
        assert!(p.starts_with("line 30"));
        assert!(p.ends_with("line 49"));
    }

    #[test]
    fn preview_of_empty_is_empty() {
        assert_eq!(preview(""), "");
    }
}
