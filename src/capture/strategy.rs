// The four capture strategies
//
// Each fills a fresh memory surface sized to the window's current rectangle
// through a different OS mechanism. `Ok(None)` means the mechanism produced
// no usable content; `Err` is reserved for failing to set up the surface.

use std::time::Duration;

use tracing::debug;

use super::blank::is_blank;
use super::method::CaptureMethod;
use super::surface::{with_surface, DrawingSurface, ShowCommand, WindowSystem};
use super::types::{CapturedImage, WindowHandle};
use crate::config::CaptureConfig;
use crate::error::CaptureResult;

/// Direct block-transfer from the window's on-screen surface.
pub fn standard_copy<S>(system: &S, window: WindowHandle) -> CaptureResult<Option<CapturedImage>>
where
    S: WindowSystem + ?Sized,
{
    with_surface(system, window, |surface, _| {
        if !surface.copy_from_window() {
            debug!(event = "capture.strategy.blit_failed", %window);
            return Ok(None);
        }
        Ok(read_back(surface, window))
    })
}

/// Ask the window to render its full content into the memory surface.
pub fn forced_render<S>(system: &S, window: WindowHandle) -> CaptureResult<Option<CapturedImage>>
where
    S: WindowSystem + ?Sized,
{
    with_surface(system, window, |surface, _| {
        if !surface.request_render() {
            debug!(event = "capture.strategy.render_refused", %window);
            return Ok(None);
        }
        Ok(read_back(surface, window))
    })
}

/// Synchronous paint request for client, non-client and child regions.
///
/// The window's answer to the message carries no meaning, so whatever ended
/// up on the surface is returned.
pub fn paint_message<S>(system: &S, window: WindowHandle) -> CaptureResult<Option<CapturedImage>>
where
    S: WindowSystem + ?Sized,
{
    with_surface(system, window, |surface, _| {
        surface.request_paint();
        Ok(read_back(surface, window))
    })
}

/// Force the window visible and foreground, wait `render_settle`, then try a
/// standard copy, falling back to a forced render if that comes back blank.
///
/// The window's prior minimized/visible state is put back before returning.
pub fn composition_fallback<S>(
    system: &S,
    window: WindowHandle,
    render_settle: Duration,
    blank_threshold: f64,
) -> CaptureResult<Option<CapturedImage>>
where
    S: WindowSystem + ?Sized,
{
    let forced = ForcedVisibility::apply(system, window);
    system.settle(render_settle);

    let copied = match standard_copy(system, window) {
        Ok(copied) => copied,
        Err(err) => {
            debug!(event = "capture.strategy.composition_copy_failed", %window, error = %err);
            None
        }
    };

    let result = match copied {
        Some(image) if !is_blank(&image, blank_threshold) => Ok(Some(image)),
        _ => forced_render(system, window),
    };

    forced.restore();
    result
}

/// Run one concrete strategy. `Auto` has no strategy of its own.
pub(crate) fn run<S>(
    system: &S,
    window: WindowHandle,
    method: CaptureMethod,
    config: &CaptureConfig,
) -> CaptureResult<Option<CapturedImage>>
where
    S: WindowSystem + ?Sized,
{
    match method {
        CaptureMethod::StandardCopy => standard_copy(system, window),
        CaptureMethod::ForcedRender => forced_render(system, window),
        CaptureMethod::PaintMessage => paint_message(system, window),
        CaptureMethod::CompositionFallback => composition_fallback(
            system,
            window,
            config.render_settle,
            config.blank_threshold,
        ),
        CaptureMethod::Auto => unreachable!("auto is expanded before dispatch"),
    }
}

/// Pixel read-back failures count as "no content", not as a hard error.
fn read_back<D: DrawingSurface>(surface: &D, window: WindowHandle) -> Option<CapturedImage> {
    match surface.extract_pixels() {
        Ok(image) => Some(image),
        Err(err) => {
            debug!(event = "capture.strategy.readback_failed", %window, error = %err);
            None
        }
    }
}

/// Visibility/foreground override owned by the composition strategy.
///
/// Independent of the orchestrator's minimized-state guard: it restores only
/// what it changed itself.
struct ForcedVisibility<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    window: WindowHandle,
    was_minimized: bool,
    was_visible: bool,
    done: bool,
}

impl<'a, S: WindowSystem + ?Sized> ForcedVisibility<'a, S> {
    fn apply(system: &'a S, window: WindowHandle) -> Self {
        let was_minimized = system.is_minimized(window);
        let was_visible = system.is_visible(window);

        if was_minimized {
            system.show_window(window, ShowCommand::Restore);
        }
        if !was_visible {
            system.show_window(window, ShowCommand::Show);
        }
        if !system.set_foreground(window) {
            debug!(event = "capture.strategy.foreground_refused", %window);
        }

        Self {
            system,
            window,
            was_minimized,
            was_visible,
            done: false,
        }
    }

    fn restore(mut self) {
        self.put_back();
    }

    fn put_back(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if self.was_minimized {
            self.system.show_window(self.window, ShowCommand::Minimize);
        }
        if !self.was_visible {
            self.system.show_window(self.window, ShowCommand::Hide);
        }
    }
}

impl<S: WindowSystem + ?Sized> Drop for ForcedVisibility<'_, S> {
    fn drop(&mut self) {
        self.put_back();
    }
}
