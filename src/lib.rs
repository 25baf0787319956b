//! # windowshot
//!
//! Screenshots of individual windows, including minimized, occluded and
//! GPU-composited ones.
//!
//! No single OS capture mechanism works for every window, so the capturer
//! tries several in order (block copy, forced full-content render, paint
//! message, forced-foreground composition capture) and keeps the first image
//! that is not blank. Minimized windows are restored for the capture and
//! minimized again afterwards, whatever the outcome.
//!
//! ## Rust usage
//!
//! ```no_run
//! # #[cfg(windows)] {
//! use windowshot::{capture_window_by_title, init_logging};
//!
//! init_logging(true);
//! let report = capture_window_by_title("Notepad", Some("notepad.png".as_ref()), "auto", true)
//!     .unwrap()
//!     .expect("no Notepad window");
//! match (&report.image, &report.save_error) {
//!     (Some(image), None) => println!("{}x{}", image.width(), image.height()),
//!     (Some(_), Some(err)) => println!("captured, but not saved: {err:#}"),
//!     (None, _) => println!("no usable capture"),
//! }
//! # }
//! ```
//!
//! The engine itself is written against [`WindowSystem`], so it can be driven
//! by any window backend; [`platform`] holds the Win32 one.

pub mod capture;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod platform;

pub use capture::{
    is_blank, Attempt, AttemptOutcome, CaptureMethod, CaptureReport, CapturedImage,
    DrawingSurface, ShowCommand, WindowCapturer, WindowGeometry, WindowHandle, WindowSystem,
    DEFAULT_BLANK_THRESHOLD,
};
pub use config::CaptureConfig;
pub use error::{CaptureError, CaptureResult};
pub use logging::init_logging;

#[cfg(windows)]
pub use platform::win32::{
    capture_window, capture_window_by_title, enable_dpi_awareness, find_window,
    find_windows_by_title, list_windows, Win32Windows, WindowInfo,
};
