use std::fmt;
use std::str::FromStr;

use crate::error::CaptureError;

/// Capture method selected by caller.
///
/// - `StandardCopy`: BitBlt from the window's live surface. Fastest, blind to
///   windows rendered outside the normal paint pipeline.
/// - `ForcedRender`: ask the window to render itself (`PrintWindow`).
/// - `PaintMessage`: synchronous `WM_PRINT` covering client, non-client and
///   child regions.
/// - `CompositionFallback`: force visible + foreground, then standard copy
///   falling back to forced render. Visibly disturbs the desktop.
/// - `Auto`: all of the above, in that order, until one yields content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureMethod {
    #[default]
    Auto,
    StandardCopy,
    ForcedRender,
    PaintMessage,
    CompositionFallback,
}

/// Order tried by [`CaptureMethod::Auto`], least to most invasive.
pub const AUTO_SEQUENCE: [CaptureMethod; 4] = [
    CaptureMethod::StandardCopy,
    CaptureMethod::ForcedRender,
    CaptureMethod::PaintMessage,
    CaptureMethod::CompositionFallback,
];

impl CaptureMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::StandardCopy => "standard",
            Self::ForcedRender => "printwindow",
            Self::PaintMessage => "paint",
            Self::CompositionFallback => "composition",
        }
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Concrete strategies to run, in order. `Auto` is never itself executed.
    pub fn strategies(self) -> &'static [CaptureMethod] {
        match self {
            Self::Auto => &AUTO_SEQUENCE,
            Self::StandardCopy => &AUTO_SEQUENCE[0..1],
            Self::ForcedRender => &AUTO_SEQUENCE[1..2],
            Self::PaintMessage => &AUTO_SEQUENCE[2..3],
            Self::CompositionFallback => &AUTO_SEQUENCE[3..4],
        }
    }
}

impl FromStr for CaptureMethod {
    type Err = CaptureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "standard" | "standard-copy" | "bitblt" => Ok(Self::StandardCopy),
            "printwindow" | "forced-render" => Ok(Self::ForcedRender),
            "paint" | "paint-message" | "wm-print" | "d3d" => Ok(Self::PaintMessage),
            "composition" | "composition-fallback" => Ok(Self::CompositionFallback),
            _ => Err(CaptureError::UnknownMethod(name.to_string())),
        }
    }
}

impl fmt::Display for CaptureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
