// Capability surface consumed from the host windowing subsystem
//
// The capture engine only talks to the OS through these two traits. The
// Win32 implementation lives in `platform::win32`.

use std::time::Duration;

use super::types::{CapturedImage, WindowGeometry, WindowHandle};
use crate::error::{CaptureError, CaptureResult};

/// Show-state change requested from the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// Un-minimize (`SW_RESTORE`).
    Restore,
    /// Minimize (`SW_MINIMIZE`).
    Minimize,
    /// Make visible without activating (`SW_SHOWNA`).
    Show,
    /// Hide (`SW_HIDE`).
    Hide,
}

/// Window queries and state changes used around a capture.
pub trait WindowSystem {
    type Surface: DrawingSurface;

    /// Current bounding rectangle of `window`.
    fn window_geometry(&self, window: WindowHandle) -> CaptureResult<WindowGeometry>;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn is_visible(&self, window: WindowHandle) -> bool;

    fn show_window(&self, window: WindowHandle, command: ShowCommand);

    /// Returns `false` when the window manager refused the focus change.
    fn set_foreground(&self, window: WindowHandle) -> bool;

    /// Acquire the window surface, a compatible memory surface and a backing
    /// bitmap of `width x height`.
    ///
    /// Either the whole bundle is returned or nothing is: anything allocated
    /// before a failing step is released before the error is returned.
    fn acquire_surface(
        &self,
        window: WindowHandle,
        width: i32,
        height: i32,
    ) -> CaptureResult<Self::Surface>;

    /// Fixed settle delay for window-manager transitions.
    fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// A scoped drawing-surface bundle. Dropping it releases every OS resource.
pub trait DrawingSurface {
    /// Block-transfer the window's on-screen surface into the memory surface.
    fn copy_from_window(&mut self) -> bool;

    /// Ask the window to render its full content into the memory surface.
    fn request_render(&mut self) -> bool;

    /// Send a synchronous paint request (client, non-client and children)
    /// targeting the memory surface.
    fn request_paint(&mut self) -> bool;

    /// Copy the backing bitmap out into an owned RGB image.
    fn extract_pixels(&self) -> CaptureResult<CapturedImage>;

    /// Release all OS resources. Idempotent.
    fn release(&mut self);
}

/// Scoped acquisition: acquire a surface sized to the window, hand it to
/// `body`, and release it on every exit path.
pub fn with_surface<S, T>(
    system: &S,
    window: WindowHandle,
    body: impl FnOnce(&mut S::Surface, WindowGeometry) -> CaptureResult<T>,
) -> CaptureResult<T>
where
    S: WindowSystem + ?Sized,
{
    let geometry = system.window_geometry(window)?;
    if !geometry.has_area() {
        return Err(CaptureError::EmptyGeometry {
            window,
            width: geometry.width,
            height: geometry.height,
        });
    }

    let mut surface = system.acquire_surface(window, geometry.width, geometry.height)?;
    let result = body(&mut surface, geometry);
    // Drop would release too; releasing here keeps the order explicit
    surface.release();
    result
}
