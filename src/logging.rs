use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Emit at `info` when `$verbose` is set, `debug` otherwise.
macro_rules! outcome {
    ($verbose:expr, $($field:tt)+) => {
        if $verbose {
            ::tracing::info!($($field)+);
        } else {
            ::tracing::debug!($($field)+);
        }
    };
}

pub(crate) use outcome;

/// Install a stderr `tracing` subscriber for this crate's events.
///
/// When `verbose` is true, info-level events (per-strategy attempts and
/// outcomes of verbose capturers) are shown; otherwise only warnings and
/// errors. `RUST_LOG` directives take precedence. Calling this more than
/// once, or after another subscriber was installed, is a no-op.
pub fn init_logging(verbose: bool) {
    let directive = if verbose {
        "windowshot=info"
    } else {
        "windowshot=warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
