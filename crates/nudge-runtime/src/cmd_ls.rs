//! `nudge ls` and `nudge candidates` — window listing verbs.

use nudge_core::config::TargetSpec;
use nudge_core::resolver::matches_heuristic;
use nudge_core::types::WindowInfo;
use nudge_window::WindowBackend;

/// Build aligned listing lines: `handle  pid  class  title`.
pub(crate) fn format_window_lines(windows: &[WindowInfo]) -> Vec<String> {
    let handle_width = windows
        .iter()
        .map(|w| w.handle.to_string().len())
        .max()
        .unwrap_or(0);
    let class_width = windows
        .iter()
        .map(|w| w.class_name.len())
        .max()
        .unwrap_or(0);

    windows
        .iter()
        .map(|w| {
            format!(
                "{:<hw$}  {:>7}  {:<cw$}  {}",
                w.handle.to_string(),
                w.pid,
                w.class_name,
                w.title,
                hw = handle_width,
                cw = class_width,
            )
        })
        .collect()
}

/// Entry point for `nudge ls`.
pub fn cmd_ls(backend: &impl WindowBackend, json: bool) -> anyhow::Result<()> {
    let mut windows = backend.enumerate()?;
    // Untitled windows are noise in a listing meant for picking targets.
    windows.retain(|w| !w.title.is_empty());

    if json {
        println!("{}", serde_json::to_string_pretty(&windows)?);
        return Ok(());
    }

    if windows.is_empty() {
        eprintln!("no titled windows");
        return Ok(());
    }
    for line in format_window_lines(&windows) {
        println!("{line}");
    }
    Ok(())
}

/// Entry point for `nudge candidates`: only windows the heuristic scan
/// would accept as the target.
pub fn cmd_candidates(backend: &impl WindowBackend, spec: &TargetSpec) -> anyhow::Result<()> {
    let windows = backend.enumerate()?;
    let candidates: Vec<WindowInfo> = windows
        .into_iter()
        .filter(|w| matches_heuristic(spec, w))
        .collect();

    if candidates.is_empty() {
        eprintln!("no candidate windows");
        return Ok(());
    }
    for line in format_window_lines(&candidates) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::types::WindowHandle;

    fn window(handle: u64, title: &str, class: &str) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle(handle),
            title: title.to_string(),
            class_name: class.to_string(),
            pid: 100,
        }
    }

    #[test]
    fn lines_are_aligned_on_handle_and_class() {
        let windows = vec![
            window(0x1, "first", "ConsoleWindowClass"),
            window(0xABCDEF, "second", "Np"),
        ];
        let lines = format_window_lines(&windows);
        assert_eq!(lines.len(), 2);
        // Both class columns start at the same offset.
        let start0 = lines[0].find("ConsoleWindowClass").expect("class present");
        let start1 = lines[1].find("Np").expect("class present");
        assert_eq!(start0, start1);
        assert!(lines[1].contains("0xABCDEF"));
    }

    #[test]
    fn empty_list_formats_to_nothing() {
        assert!(format_window_lines(&[]).is_empty());
    }
}
