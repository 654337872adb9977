//! Win32 backend: EnumWindows enumeration, WM_GETTEXT reads and
//! SendInput injection.

use core::ffi::c_void;
use std::mem;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, SendInput, SetFocus, VIRTUAL_KEY, VK_RETURN,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumChildWindows, EnumWindows, GetClassNameW, GetWindowTextW, GetWindowThreadProcessId,
    IsWindow, IsWindowVisible, SendMessageW, SetForegroundWindow, WM_GETTEXT,
};

use nudge_core::types::{WindowHandle, WindowInfo};

use crate::backend::WindowBackend;
use crate::error::WindowError;

/// Text controls can hold a full console scrollback; cap each read.
const TEXT_BUFFER_CHARS: usize = 64 * 1024;

pub struct Win32Backend;

impl Win32Backend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win32Backend {
    fn default() -> Self {
        Self::new()
    }
}

fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.raw() as usize as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as usize as u64)
}

fn window_title(hwnd: HWND) -> String {
    let mut buffer = [0u16; 512];
    let len = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if len <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..len as usize])
}

fn window_class(hwnd: HWND) -> String {
    let mut buffer = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd, &mut buffer) };
    if len <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..len as usize])
}

/// Read a control's text with WM_GETTEXT (works across processes where
/// GetWindowTextW does not).
fn control_text(hwnd: HWND) -> String {
    let mut buffer = vec![0u16; TEXT_BUFFER_CHARS];
    let len = unsafe {
        SendMessageW(
            hwnd,
            WM_GETTEXT,
            WPARAM(buffer.len()),
            LPARAM(buffer.as_mut_ptr() as isize),
        )
    };
    let len = len.0.clamp(0, buffer.len() as isize) as usize;
    if len == 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..len])
}

unsafe extern "system" fn collect_top_level(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let out = unsafe { &mut *(lparam.0 as *mut Vec<WindowInfo>) };

    if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
        return TRUE;
    }

    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };

    out.push(WindowInfo {
        handle: from_hwnd(hwnd),
        title: window_title(hwnd),
        class_name: window_class(hwnd),
        pid,
    });
    TRUE
}

unsafe extern "system" fn collect_child_text(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let out = unsafe { &mut *(lparam.0 as *mut Vec<String>) };
    let text = control_text(hwnd);
    if !text.is_empty() {
        out.push(text);
    }
    TRUE
}

fn send_unicode_char(unit: u16) -> [INPUT; 2] {
    let down = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: unit,
                dwFlags: KEYEVENTF_UNICODE,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let up = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: unit,
                dwFlags: KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    [down, up]
}

fn send_vk(vk: VIRTUAL_KEY) -> [INPUT; 2] {
    let down = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: KEYBD_EVENT_FLAGS(0),
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let up = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: KEYEVENTF_KEYUP,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    [down, up]
}

impl WindowBackend for Win32Backend {
    fn enumerate(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let mut windows: Vec<WindowInfo> = Vec::new();
        let lparam = LPARAM(&mut windows as *mut Vec<WindowInfo> as isize);
        unsafe { EnumWindows(Some(collect_top_level), lparam) }
            .map_err(|e| WindowError::EnumerationFailed(e.to_string()))?;
        Ok(windows)
    }

    fn read_text(&self, handle: WindowHandle) -> Result<Vec<String>, WindowError> {
        let hwnd = to_hwnd(handle);
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Err(WindowError::WindowGone(handle.raw()));
        }

        let mut fragments: Vec<String> = Vec::new();
        let lparam = LPARAM(&mut fragments as *mut Vec<String> as isize);
        // EnumChildWindows returns FALSE for childless windows; that is
        // the fallback case, not an error.
        let _ = unsafe { EnumChildWindows(hwnd, Some(collect_child_text), lparam) };

        if fragments.is_empty() {
            let own = control_text(hwnd);
            if !own.is_empty() {
                fragments.push(own);
            }
        }
        Ok(fragments)
    }

    fn send_keys(
        &self,
        handle: WindowHandle,
        text: &str,
        press_enter: bool,
    ) -> Result<(), WindowError> {
        let hwnd = to_hwnd(handle);
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Err(WindowError::WindowGone(handle.raw()));
        }

        // SendInput targets the foreground window; bring the target up
        // first. Console windows ignore focus-less injection entirely.
        if !unsafe { SetForegroundWindow(hwnd) }.as_bool() {
            return Err(WindowError::InjectionFailed(format!(
                "could not focus window {handle}"
            )));
        }
        let _ = unsafe { SetFocus(hwnd) };

        let mut inputs: Vec<INPUT> = Vec::with_capacity(text.len() * 2 + 2);
        for unit in text.encode_utf16() {
            inputs.extend_from_slice(&send_unicode_char(unit));
        }
        if press_enter {
            inputs.extend_from_slice(&send_vk(VK_RETURN));
        }
        if inputs.is_empty() {
            return Ok(());
        }

        let injected = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
        if injected as usize != inputs.len() {
            return Err(WindowError::InjectionFailed(format!(
                "injected {injected} of {} events",
                inputs.len()
            )));
        }
        Ok(())
    }
}
