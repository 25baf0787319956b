// Window state save/override/restore around a capture

use std::time::Duration;

use tracing::debug;

use super::surface::{ShowCommand, WindowSystem};
use super::types::WindowHandle;

/// Makes a window capturable without permanently changing its on-screen state.
pub struct WindowStateController<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    restore_settle: Duration,
}

impl<S: WindowSystem + ?Sized> Clone for WindowStateController<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: WindowSystem + ?Sized> Copy for WindowStateController<'_, S> {}

impl<'a, S: WindowSystem + ?Sized> WindowStateController<'a, S> {
    pub fn new(system: &'a S, restore_settle: Duration) -> Self {
        Self {
            system,
            restore_settle,
        }
    }

    pub fn is_minimized(&self, window: WindowHandle) -> bool {
        self.system.is_minimized(window)
    }

    /// Restore `window` if minimized and wait the settle interval.
    ///
    /// Returns whether a restore was issued.
    pub fn ensure_restored(&self, window: WindowHandle) -> bool {
        if !self.system.is_minimized(window) {
            return false;
        }
        debug!(event = "capture.state.restore", %window);
        self.system.show_window(window, ShowCommand::Restore);
        self.system.settle(self.restore_settle);
        true
    }

    /// Minimize a window previously restored by [`ensure_restored`](Self::ensure_restored).
    pub fn reassert_minimized(&self, window: WindowHandle) {
        debug!(event = "capture.state.reminimize", %window);
        self.system.show_window(window, ShowCommand::Minimize);
    }

    /// Record the minimized state and restore the window if needed.
    ///
    /// The returned guard re-minimizes exactly once, when it is finished or
    /// dropped, whichever comes first.
    pub fn save(&self, window: WindowHandle) -> MinimizedStateGuard<'a, S> {
        let was_minimized = self.ensure_restored(window);
        MinimizedStateGuard {
            controller: *self,
            window,
            was_minimized,
            done: false,
        }
    }
}

/// Snapshot of a window's minimized state, restored on drop.
pub struct MinimizedStateGuard<'a, S: WindowSystem + ?Sized> {
    controller: WindowStateController<'a, S>,
    window: WindowHandle,
    was_minimized: bool,
    done: bool,
}

impl<S: WindowSystem + ?Sized> MinimizedStateGuard<'_, S> {
    pub fn was_minimized(&self) -> bool {
        self.was_minimized
    }

    /// Reassert the saved state now.
    pub fn finish(mut self) {
        self.reassert();
    }

    fn reassert(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if self.was_minimized {
            self.controller.reassert_minimized(self.window);
        }
    }
}

impl<S: WindowSystem + ?Sized> Drop for MinimizedStateGuard<'_, S> {
    fn drop(&mut self) {
        self.reassert();
    }
}
