use crate::capture::WindowHandle;

/// Errors produced by the capture engine.
///
/// Only [`CaptureError::UnknownMethod`] ever reaches the caller of
/// `screenshot_window`; every other variant describes a single failed
/// strategy attempt and is recorded in the capture report instead.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("unknown capture method '{0}' (expected auto, standard, printwindow, paint or composition)")]
    UnknownMethod(String),

    #[error("failed to create drawing surface ({stage}): {reason}")]
    SurfaceCreation { stage: &'static str, reason: String },

    #[error("failed to query geometry of window {window}: {reason}")]
    Geometry { window: WindowHandle, reason: String },

    #[error("window {window} has no drawable area ({width}x{height})")]
    EmptyGeometry {
        window: WindowHandle,
        width: i32,
        height: i32,
    },

    #[error("failed to read back surface pixels: {0}")]
    Readback(String),

    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },
}

impl CaptureError {
    /// Configuration errors are reported before any window state is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownMethod(_))
    }

    pub(crate) fn surface(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::SurfaceCreation {
            stage,
            reason: reason.into(),
        }
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;
