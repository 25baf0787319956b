// Capture configuration with environment-variable overrides

use std::time::Duration;

use crate::capture::blank::DEFAULT_BLANK_THRESHOLD;

/// Settle delay after restoring a minimized window.
pub const DEFAULT_RESTORE_SETTLE: Duration = Duration::from_millis(500);

/// Delay after forcing a window to the foreground, before copying it.
pub const DEFAULT_RENDER_SETTLE: Duration = Duration::from_millis(100);

pub const ENV_VERBOSE: &str = "WINDOWSHOT_VERBOSE";
pub const ENV_RESTORE_SETTLE_MS: &str = "WINDOWSHOT_RESTORE_SETTLE_MS";
pub const ENV_RENDER_SETTLE_MS: &str = "WINDOWSHOT_RENDER_SETTLE_MS";
pub const ENV_BLANK_THRESHOLD: &str = "WINDOWSHOT_BLANK_THRESHOLD";

/// Tunables of a capture run.
///
/// The settle delays are flat, best-effort waits for the window manager; they
/// do not guarantee the transition has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Emit per-strategy attempt/outcome events at `info` instead of `debug`.
    pub verbose: bool,
    pub restore_settle: Duration,
    pub render_settle: Duration,
    pub blank_threshold: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            restore_settle: DEFAULT_RESTORE_SETTLE,
            render_settle: DEFAULT_RENDER_SETTLE,
            blank_threshold: DEFAULT_BLANK_THRESHOLD,
        }
    }
}

impl CaptureConfig {
    /// Defaults overlaid with `WINDOWSHOT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values looked up through `lookup`; unparsable values are
    /// ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_VERBOSE) {
            self.verbose = is_truthy(&raw);
        }
        if let Some(ms) = parse_var(&lookup, ENV_RESTORE_SETTLE_MS, |raw| raw.parse::<u64>().ok()) {
            self.restore_settle = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, ENV_RENDER_SETTLE_MS, |raw| raw.parse::<u64>().ok()) {
            self.render_settle = Duration::from_millis(ms);
        }
        if let Some(threshold) = parse_var(&lookup, ENV_BLANK_THRESHOLD, |raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|t| t.is_finite() && *t >= 0.0)
        }) {
            self.blank_threshold = threshold;
        }
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_restore_settle(mut self, delay: Duration) -> Self {
        self.restore_settle = delay;
        self
    }

    pub fn with_render_settle(mut self, delay: Duration) -> Self {
        self.render_settle = delay;
        self
    }

    pub fn with_blank_threshold(mut self, threshold: f64) -> Self {
        self.blank_threshold = threshold;
        self
    }
}

/// `1`, `true`, `yes` or `on`, case-insensitive, trimmed.
fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(name)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!(event = "config.env.invalid", var = name, value = %raw);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert!(!config.verbose);
        assert_eq!(config.restore_settle, Duration::from_millis(500));
        assert_eq!(config.render_settle, Duration::from_millis(100));
        assert_eq!(config.blank_threshold, 100.0);
    }

    #[test]
    fn test_env_overrides() {
        let config = CaptureConfig::default().with_env_overrides(lookup(&[
            (ENV_VERBOSE, " Yes "),
            (ENV_RESTORE_SETTLE_MS, "250"),
            (ENV_RENDER_SETTLE_MS, "0"),
            (ENV_BLANK_THRESHOLD, "42.5"),
        ]));
        assert!(config.verbose);
        assert_eq!(config.restore_settle, Duration::from_millis(250));
        assert_eq!(config.render_settle, Duration::ZERO);
        assert_eq!(config.blank_threshold, 42.5);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let config = CaptureConfig::default().with_env_overrides(lookup(&[
            (ENV_VERBOSE, "nope"),
            (ENV_RESTORE_SETTLE_MS, "-5"),
            (ENV_BLANK_THRESHOLD, "NaN"),
        ]));
        assert!(!config.verbose);
        assert_eq!(config.restore_settle, DEFAULT_RESTORE_SETTLE);
        assert_eq!(config.blank_threshold, DEFAULT_BLANK_THRESHOLD);
    }

    #[test]
    fn test_builders() {
        let config = CaptureConfig::default()
            .with_verbose(true)
            .with_restore_settle(Duration::ZERO)
            .with_render_settle(Duration::from_millis(5))
            .with_blank_threshold(10.0);
        assert!(config.verbose);
        assert_eq!(config.restore_settle, Duration::ZERO);
        assert_eq!(config.render_settle, Duration::from_millis(5));
        assert_eq!(config.blank_threshold, 10.0);
    }
}
