//! WindowBackend trait and platform backend selection.
//! Trait-object design enables mock injection for testing.

use nudge_core::types::{WindowHandle, WindowInfo};

use crate::error::WindowError;

/// Capability surface over the OS window facility.
pub trait WindowBackend: Send + Sync {
    /// Enumerate all top-level windows.
    fn enumerate(&self) -> Result<Vec<WindowInfo>, WindowError>;

    /// Read the visible text fragments of a window's descendant
    /// text-bearing controls. Order follows child enumeration order;
    /// completeness is best-effort.
    fn read_text(&self, handle: WindowHandle) -> Result<Vec<String>, WindowError>;

    /// Inject `text` as synthetic keystrokes into the window, followed
    /// by Enter when `press_enter` is set.
    fn send_keys(&self, handle: WindowHandle, text: &str, press_enter: bool)
    -> Result<(), WindowError>;
}

impl<T: WindowBackend + ?Sized> WindowBackend for &T {
    fn enumerate(&self) -> Result<Vec<WindowInfo>, WindowError> {
        (**self).enumerate()
    }

    fn read_text(&self, handle: WindowHandle) -> Result<Vec<String>, WindowError> {
        (**self).read_text(handle)
    }

    fn send_keys(
        &self,
        handle: WindowHandle,
        text: &str,
        press_enter: bool,
    ) -> Result<(), WindowError> {
        (**self).send_keys(handle, text, press_enter)
    }
}

/// Construct the backend for the current platform.
#[cfg(windows)]
pub fn platform_backend() -> Result<crate::win32::Win32Backend, WindowError> {
    Ok(crate::win32::Win32Backend::new())
}

/// Non-Windows builds have no window facility; callers degrade to an
/// error message rather than failing to compile.
#[cfg(not(windows))]
pub fn platform_backend() -> Result<UnsupportedBackend, WindowError> {
    Err(WindowError::Unsupported)
}

/// Placeholder backend type for non-Windows targets. Never constructed;
/// exists so `platform_backend` has a concrete success type.
#[cfg(not(windows))]
pub struct UnsupportedBackend;

#[cfg(not(windows))]
impl WindowBackend for UnsupportedBackend {
    fn enumerate(&self) -> Result<Vec<WindowInfo>, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn read_text(&self, _handle: WindowHandle) -> Result<Vec<String>, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn send_keys(
        &self,
        _handle: WindowHandle,
        _text: &str,
        _press_enter: bool,
    ) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mock;
    impl WindowBackend for Mock {
        fn enumerate(&self) -> Result<Vec<WindowInfo>, WindowError> {
            Ok(vec![WindowInfo {
                handle: WindowHandle(1),
                title: "one".into(),
                class_name: "C".into(),
                pid: 1,
            }])
        }

        fn read_text(&self, _handle: WindowHandle) -> Result<Vec<String>, WindowError> {
            Ok(vec!["line".into()])
        }

        fn send_keys(
            &self,
            _handle: WindowHandle,
            _text: &str,
            _press_enter: bool,
        ) -> Result<(), WindowError> {
            Ok(())
        }
    }

    #[test]
    fn blanket_ref_impl() {
        let mock = Mock;
        let r: &Mock = &mock;
        assert_eq!(r.enumerate().expect("ok").len(), 1);
        assert_eq!(r.read_text(WindowHandle(1)).expect("ok"), vec!["line"]);
        assert!(r.send_keys(WindowHandle(1), "y", true).is_ok());
    }
}
