// Scripted in-process window system for unit tests.
//
// Records every call so tests can assert ordering and pairing of surface
// acquire/release and window state changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::surface::{DrawingSurface, ShowCommand, WindowSystem};
use super::types::{CapturedImage, WindowGeometry, WindowHandle};
use crate::error::{CaptureError, CaptureResult};

/// What a render mechanism does to the memory surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Render {
    /// Writes varied content and reports success.
    Noise,
    /// Writes a single flat color and reports success.
    Solid,
    /// Leaves the surface untouched and reports failure.
    Refuse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Acquire,
    Blit,
    Render,
    Paint,
    Release,
    Show(ShowCommand),
    Foreground,
    Settle(Duration),
}

struct State {
    geometry: Cell<WindowGeometry>,
    minimized: Cell<bool>,
    visible: Cell<bool>,
    foreground: Cell<bool>,
    blit: Cell<Render>,
    blit_when_foreground: Cell<Option<Render>>,
    render: Cell<Render>,
    paint: Cell<Render>,
    fail_allocation: Cell<bool>,
    failing_allocations: Cell<usize>,
    acquired: Cell<usize>,
    released: Cell<usize>,
    calls: RefCell<Vec<Call>>,
}

impl State {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

pub(crate) struct FakeSystem {
    state: Rc<State>,
}

impl FakeSystem {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            state: Rc::new(State {
                geometry: Cell::new(WindowGeometry {
                    left: 0,
                    top: 0,
                    width,
                    height,
                }),
                minimized: Cell::new(false),
                visible: Cell::new(true),
                foreground: Cell::new(false),
                blit: Cell::new(Render::Noise),
                blit_when_foreground: Cell::new(None),
                render: Cell::new(Render::Noise),
                paint: Cell::new(Render::Noise),
                fail_allocation: Cell::new(false),
                failing_allocations: Cell::new(0),
                acquired: Cell::new(0),
                released: Cell::new(0),
                calls: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn handle(&self) -> WindowHandle {
        WindowHandle::from_raw(0x42)
    }

    pub(crate) fn minimized(self, minimized: bool) -> Self {
        self.state.minimized.set(minimized);
        self
    }

    pub(crate) fn hidden(self) -> Self {
        self.state.visible.set(false);
        self
    }

    pub(crate) fn script_blit(&self, render: Render) {
        self.state.blit.set(render);
    }

    pub(crate) fn script_blit_when_foreground(&self, render: Render) {
        self.state.blit_when_foreground.set(Some(render));
    }

    pub(crate) fn script_render(&self, render: Render) {
        self.state.render.set(render);
    }

    pub(crate) fn script_paint(&self, render: Render) {
        self.state.paint.set(render);
    }

    pub(crate) fn fail_allocation(&self, fail: bool) {
        self.state.fail_allocation.set(fail);
    }

    /// Fail only the next `count` surface allocations.
    pub(crate) fn fail_next_allocations(&self, count: usize) {
        self.state.failing_allocations.set(count);
    }

    pub(crate) fn currently_minimized(&self) -> bool {
        self.state.minimized.get()
    }

    pub(crate) fn currently_visible(&self) -> bool {
        self.state.visible.get()
    }

    pub(crate) fn acquired(&self) -> usize {
        self.state.acquired.get()
    }

    pub(crate) fn released(&self) -> usize {
        self.state.released.get()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.calls.borrow().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.state.calls.borrow().iter().filter(|c| *c == call).count()
    }
}

impl WindowSystem for FakeSystem {
    type Surface = FakeSurface;

    fn window_geometry(&self, _window: WindowHandle) -> CaptureResult<WindowGeometry> {
        Ok(self.state.geometry.get())
    }

    fn is_minimized(&self, _window: WindowHandle) -> bool {
        self.state.minimized.get()
    }

    fn is_visible(&self, _window: WindowHandle) -> bool {
        self.state.visible.get()
    }

    fn show_window(&self, _window: WindowHandle, command: ShowCommand) {
        self.state.record(Call::Show(command));
        match command {
            ShowCommand::Restore => {
                self.state.minimized.set(false);
                self.state.visible.set(true);
            }
            ShowCommand::Minimize => {
                self.state.minimized.set(true);
                self.state.foreground.set(false);
            }
            ShowCommand::Show => self.state.visible.set(true),
            ShowCommand::Hide => self.state.visible.set(false),
        }
    }

    fn set_foreground(&self, _window: WindowHandle) -> bool {
        self.state.record(Call::Foreground);
        self.state.foreground.set(true);
        true
    }

    fn acquire_surface(
        &self,
        _window: WindowHandle,
        width: i32,
        height: i32,
    ) -> CaptureResult<FakeSurface> {
        let pending = self.state.failing_allocations.get();
        if pending > 0 {
            self.state.failing_allocations.set(pending - 1);
            return Err(CaptureError::surface("bitmap", "scripted allocation failure"));
        }
        if self.state.fail_allocation.get() {
            return Err(CaptureError::surface("bitmap", "scripted allocation failure"));
        }
        self.state.record(Call::Acquire);
        self.state.acquired.set(self.state.acquired.get() + 1);
        Ok(FakeSurface {
            state: Rc::clone(&self.state),
            width: width as u32,
            height: height as u32,
            content: None,
            released: false,
        })
    }

    fn settle(&self, delay: Duration) {
        self.state.record(Call::Settle(delay));
    }
}

pub(crate) struct FakeSurface {
    state: Rc<State>,
    width: u32,
    height: u32,
    content: Option<CapturedImage>,
    released: bool,
}

impl FakeSurface {
    fn apply(&mut self, render: Render) -> bool {
        match render {
            Render::Noise => {
                self.content = Some(noise(self.width, self.height));
                true
            }
            Render::Solid => {
                self.content = Some(CapturedImage::solid(self.width, self.height, [240, 240, 240]));
                true
            }
            Render::Refuse => false,
        }
    }
}

impl DrawingSurface for FakeSurface {
    fn copy_from_window(&mut self) -> bool {
        self.state.record(Call::Blit);
        let render = match self.state.blit_when_foreground.get() {
            Some(render) if self.state.foreground.get() => render,
            _ => self.state.blit.get(),
        };
        self.apply(render)
    }

    fn request_render(&mut self) -> bool {
        self.state.record(Call::Render);
        self.apply(self.state.render.get())
    }

    fn request_paint(&mut self) -> bool {
        self.state.record(Call::Paint);
        self.apply(self.state.paint.get())
    }

    fn extract_pixels(&self) -> CaptureResult<CapturedImage> {
        Ok(self
            .content
            .clone()
            .unwrap_or_else(|| CapturedImage::solid(self.width, self.height, [0, 0, 0])))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.state.record(Call::Release);
        self.state.released.set(self.state.released.get() + 1);
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        self.release();
    }
}

/// Deterministic high-variance test pattern.
pub(crate) fn noise(width: u32, height: u32) -> CapturedImage {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[
                (x.wrapping_mul(37) ^ y.wrapping_mul(11)) as u8,
                (x.wrapping_mul(13) + y.wrapping_mul(29)) as u8,
                (x ^ y).wrapping_mul(53) as u8,
            ]);
        }
    }
    CapturedImage::from_rgb(width, height, data).expect("noise buffer matches dimensions")
}
