// Win32 implementation of the window-system capability traits

pub mod discovery;
pub mod surface;

use std::ffi::c_void;
use std::path::Path;

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowRect, IsIconic, IsWindowVisible, SetForegroundWindow, ShowWindow, SHOW_WINDOW_CMD,
    SW_HIDE, SW_MINIMIZE, SW_RESTORE, SW_SHOWNA,
};

pub use discovery::{find_window, find_windows_by_title, list_windows, WindowInfo};
pub use surface::GdiSurface;

use crate::capture::{
    CaptureMethod, CaptureReport, ShowCommand, WindowCapturer, WindowGeometry, WindowHandle,
    WindowSystem,
};
use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};
use crate::logging::outcome;

/// The live desktop, through user32 and GDI.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Windows;

pub(crate) fn to_hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut c_void)
}

pub(crate) fn to_handle(hwnd: HWND) -> WindowHandle {
    WindowHandle::from_raw(hwnd.0 as isize)
}

fn show_command(command: ShowCommand) -> SHOW_WINDOW_CMD {
    match command {
        ShowCommand::Restore => SW_RESTORE,
        ShowCommand::Minimize => SW_MINIMIZE,
        ShowCommand::Show => SW_SHOWNA,
        ShowCommand::Hide => SW_HIDE,
    }
}

impl WindowSystem for Win32Windows {
    type Surface = GdiSurface;

    fn window_geometry(&self, window: WindowHandle) -> CaptureResult<WindowGeometry> {
        let mut rect = RECT::default();
        // SAFETY: rect is a valid out-pointer; a stale handle makes the call fail
        unsafe { GetWindowRect(to_hwnd(window), &mut rect) }.map_err(|e| {
            CaptureError::Geometry {
                window,
                reason: e.to_string(),
            }
        })?;
        Ok(WindowGeometry::from_bounds(
            rect.left,
            rect.top,
            rect.right,
            rect.bottom,
        ))
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(to_hwnd(window)) }.as_bool()
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        unsafe { IsWindowVisible(to_hwnd(window)) }.as_bool()
    }

    fn show_window(&self, window: WindowHandle, command: ShowCommand) {
        // Return value is the previous visibility, not success
        unsafe {
            let _ = ShowWindow(to_hwnd(window), show_command(command));
        }
    }

    fn set_foreground(&self, window: WindowHandle) -> bool {
        unsafe { SetForegroundWindow(to_hwnd(window)) }.as_bool()
    }

    fn acquire_surface(
        &self,
        window: WindowHandle,
        width: i32,
        height: i32,
    ) -> CaptureResult<GdiSurface> {
        GdiSurface::acquire(to_hwnd(window), width, height)
    }
}

impl WindowCapturer<Win32Windows> {
    /// Capturer bound to the live desktop.
    pub fn native(config: CaptureConfig) -> Self {
        Self::new(Win32Windows, config)
    }
}

/// Enable per-monitor DPI awareness
///
/// Window rectangles and captured pixels are then in physical pixels instead
/// of scaled logical ones.
pub fn enable_dpi_awareness() {
    unsafe {
        // SAFETY: best-effort call. Fails with E_ACCESSDENIED when the process
        // already chose a DPI mode (e.g. through its manifest), which is fine.
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// One-shot capture of `window` with settings from the environment.
///
/// `verbose` overrides `WINDOWSHOT_VERBOSE`. The report carries the image
/// (none when every strategy tried came back empty) and, separately, any
/// failure to write it to `destination`.
pub fn capture_window(
    window: WindowHandle,
    destination: Option<&Path>,
    method: &str,
    verbose: bool,
) -> CaptureResult<CaptureReport> {
    let method = method.parse::<CaptureMethod>()?;
    let capturer = WindowCapturer::native(CaptureConfig::from_env().with_verbose(verbose));
    Ok(capturer.screenshot_window_with(window, destination, method))
}

/// Capture the first visible window whose title contains `title`.
///
/// Returns `Ok(None)` when no window matches.
pub fn capture_window_by_title(
    title: &str,
    destination: Option<&Path>,
    method: &str,
    verbose: bool,
) -> CaptureResult<Option<CaptureReport>> {
    // Validate before enumerating windows
    method.parse::<CaptureMethod>()?;

    let Some(target) = find_windows_by_title(title).into_iter().next() else {
        outcome!(verbose, event = "capture.window_not_found", title);
        return Ok(None);
    };
    outcome!(verbose, event = "capture.window_found", title = %target.title, window = %target.handle);
    capture_window(target.handle, destination, method, verbose).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_conversion_round_trips() {
        let handle = WindowHandle::from_raw(0x1234);
        assert_eq!(to_handle(to_hwnd(handle)), handle);
    }

    #[test]
    fn test_null_window_has_no_geometry() {
        let err = Win32Windows
            .window_geometry(WindowHandle::from_raw(0))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Geometry { .. }));
    }

    #[test]
    fn test_capture_by_missing_title_is_none() {
        let result =
            capture_window_by_title("no window is titled like this 8c1f2e", None, "auto", false);
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_capture_save_failure_reaches_caller() {
        let Some(target) = list_windows().into_iter().next() else {
            println!("SKIPPED: no visible windows");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("window.gif");

        let report = capture_window(target.handle, Some(&path), "auto", false).unwrap();
        if !report.is_captured() {
            println!("SKIPPED: \"{}\" produced no capture", target.title);
            return;
        }
        assert!(report.save_error.is_some());
        assert!(report.saved_to.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_capture_window_rejects_unknown_method() {
        let err = capture_window(WindowHandle::from_raw(0), None, "bogus", false).unwrap_err();
        assert!(err.is_configuration());
    }
}
