//! Best-effort content snapshot.

use nudge_core::types::WindowHandle;

use crate::backend::WindowBackend;

/// Read the target window's visible text as a single snapshot string.
///
/// Concatenates all descendant text fragments; when none exist the
/// backend falls back to the window's own text. Any failure degrades to
/// the empty string — a lossy, heuristic read, never an error the
/// monitor has to handle.
pub fn snapshot_text(backend: &impl WindowBackend, handle: WindowHandle) -> String {
    match backend.read_text(handle) {
        Ok(fragments) => fragments.join("\n").trim().to_string(),
        Err(e) => {
            tracing::debug!("snapshot read failed for {handle}: {e}");
            String::new()
        }
    }
}
