// Capture orchestration: method resolution -> state save -> strategy loop
// with blank-detection feedback -> state restore -> optional persistence

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::blank::is_blank;
use super::method::CaptureMethod;
use super::state::WindowStateController;
use super::strategy;
use super::surface::WindowSystem;
use super::types::{CapturedImage, WindowHandle};
use crate::config::CaptureConfig;
use crate::error::CaptureResult;
use crate::logging::outcome;

/// How a single strategy attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Produced the returned image.
    Accepted,
    /// Produced an image, but it was blank.
    Blank,
    /// Completed without producing content.
    NoContent,
    /// Could not set up the drawing surface.
    Failed(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Blank => f.write_str("blank"),
            Self::NoContent => f.write_str("no content"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub method: CaptureMethod,
    pub outcome: AttemptOutcome,
}

/// Result of one `screenshot_window` call.
#[derive(Debug)]
pub struct CaptureReport {
    /// Accepted image; `None` when every strategy tried came back empty.
    pub image: Option<CapturedImage>,
    /// Strategy that produced `image`.
    pub method: Option<CaptureMethod>,
    /// One entry per strategy tried, in order.
    pub attempts: Vec<Attempt>,
    /// Destination the image was written to.
    pub saved_to: Option<PathBuf>,
    /// Persistence failure. The image is still returned.
    pub save_error: Option<anyhow::Error>,
}

impl CaptureReport {
    pub fn is_captured(&self) -> bool {
        self.image.is_some()
    }

    pub fn into_image(self) -> Option<CapturedImage> {
        self.image
    }
}

/// Multi-strategy window capturer.
///
/// Holds no per-capture state, so captures of different windows may run
/// independently. Captures of the same window must be serialized by the
/// caller: concurrent runs would interleave minimize/restore toggling.
///
/// # Examples
/// ```no_run
/// # #[cfg(windows)] {
/// use windowshot::{CaptureConfig, WindowCapturer};
///
/// let capturer = WindowCapturer::native(CaptureConfig::default().with_verbose(true));
/// let window = windowshot::find_windows_by_title("Notepad")[0].handle;
/// let report = capturer
///     .screenshot_window(window, Some("notepad.png".as_ref()), "auto")
///     .unwrap();
/// println!("{:?}", report.method);
/// # }
/// ```
pub struct WindowCapturer<S: WindowSystem> {
    system: S,
    config: CaptureConfig,
}

impl<S: WindowSystem> WindowCapturer<S> {
    pub fn new(system: S, config: CaptureConfig) -> Self {
        Self { system, config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    /// Capture `window` with the method named `method`.
    ///
    /// An unrecognized name fails with `CaptureError::UnknownMethod` before
    /// the window is touched.
    pub fn screenshot_window(
        &self,
        window: WindowHandle,
        destination: Option<&Path>,
        method: &str,
    ) -> CaptureResult<CaptureReport> {
        let method = method.parse::<CaptureMethod>()?;
        Ok(self.screenshot_window_with(window, destination, method))
    }

    /// Capture `window` with `method`.
    ///
    /// `Auto` tries every strategy in order and accepts the first non-blank
    /// image. An explicit method runs only that strategy and returns its
    /// result as is, blank or not.
    pub fn screenshot_window_with(
        &self,
        window: WindowHandle,
        destination: Option<&Path>,
        method: CaptureMethod,
    ) -> CaptureReport {
        let verbose = self.config.verbose;
        debug!(event = "capture.start", %window, %method);

        let controller = WindowStateController::new(&self.system, self.config.restore_settle);
        let saved = controller.save(window);

        let (image, accepted_by, attempts) = self.run_strategies(window, method);

        saved.finish();

        match &accepted_by {
            Some(m) => outcome!(verbose, event = "capture.completed", %window, method = %m),
            None => outcome!(verbose, event = "capture.exhausted", %window, tried = attempts.len()),
        }

        let mut report = CaptureReport {
            image,
            method: accepted_by,
            attempts,
            saved_to: None,
            save_error: None,
        };

        if let (Some(image), Some(path)) = (&report.image, destination) {
            match image.save(path) {
                Ok(()) => {
                    outcome!(verbose, event = "capture.saved", path = %path.display());
                    report.saved_to = Some(path.to_path_buf());
                }
                Err(err) => {
                    warn!(event = "capture.save_failed", path = %path.display(), error = %err);
                    report.save_error = Some(err);
                }
            }
        }

        report
    }

    fn run_strategies(
        &self,
        window: WindowHandle,
        method: CaptureMethod,
    ) -> (Option<CapturedImage>, Option<CaptureMethod>, Vec<Attempt>) {
        let verbose = self.config.verbose;
        let check_blank = method.is_auto();
        let mut attempts = Vec::with_capacity(method.strategies().len());

        for &strategy_method in method.strategies() {
            outcome!(verbose, event = "capture.strategy.attempt", %window, method = %strategy_method);

            let outcome = match strategy::run(&self.system, window, strategy_method, &self.config) {
                Err(err) => AttemptOutcome::Failed(err.to_string()),
                Ok(None) => AttemptOutcome::NoContent,
                Ok(Some(image)) => {
                    if check_blank && is_blank(&image, self.config.blank_threshold) {
                        AttemptOutcome::Blank
                    } else {
                        outcome!(verbose, event = "capture.strategy.outcome", %window, method = %strategy_method, outcome = "accepted");
                        attempts.push(Attempt {
                            method: strategy_method,
                            outcome: AttemptOutcome::Accepted,
                        });
                        return (Some(image), Some(strategy_method), attempts);
                    }
                }
            };

            outcome!(verbose, event = "capture.strategy.outcome", %window, method = %strategy_method, outcome = %outcome);
            attempts.push(Attempt {
                method: strategy_method,
                outcome,
            });
        }

        (None, None, attempts)
    }
}
