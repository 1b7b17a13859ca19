//! Crate-standard `tracing` setup.
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Default directive used when the requested verbosity cannot be parsed.
const FALLBACK_DIRECTIVE: &str = "info";

/// Build the filter for a verbosity string.
///
/// Accepts a bare level (`trace`, `debug`, `info`, `warn`, `error`) or any `EnvFilter` directive
/// such as `er_route=debug,info`. Unparseable input falls back to `info`.
#[must_use]
pub fn env_filter(verbosity: &str) -> EnvFilter {
    EnvFilter::try_new(verbosity).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Install the global subscriber. Logs go to stderr so command output stays clean on stdout.
///
/// Calling this more than once is harmless; later calls leave the first subscriber in place.
pub fn setup(verbosity: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    // Fails only when a global subscriber is already installed, which leaves that one in charge.
    tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(fmt_layer)
        .try_init()
        .ok();
}
