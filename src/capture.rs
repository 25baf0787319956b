// Capture engine: strategies, fallback orchestration, blank detection and
// window state management, written against the `WindowSystem` capability trait

pub mod blank;
pub mod method;
pub mod orchestrator;
pub mod state;
pub mod strategy;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use blank::{is_blank, DEFAULT_BLANK_THRESHOLD};
pub use method::CaptureMethod;
pub use orchestrator::{Attempt, AttemptOutcome, CaptureReport, WindowCapturer};
pub use state::{MinimizedStateGuard, WindowStateController};
pub use strategy::{composition_fallback, forced_render, paint_message, standard_copy};
pub use surface::{with_surface, DrawingSurface, ShowCommand, WindowSystem};
pub use types::{CapturedImage, WindowGeometry, WindowHandle};
