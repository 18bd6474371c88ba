use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workplan_core::{DEFAULT_LOG_FILTER, WORKPLAN_LOG_VAR};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `WORKPLAN_LOG` and defaults to `info`. Output goes to
/// stderr in the compact format so it never interleaves with rendered plans.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber that writes through the libtest capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let filter = env_filter().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer().with_target(false))
        .try_init();
}

fn env_filter() -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match std::env::var(WORKPLAN_LOG_VAR) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(DEFAULT_LOG_FILTER),
    }
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering a planning pass
pub fn planning_span(entry_tasks: usize) -> Span {
    span!(Level::DEBUG, "plan", entry_tasks = %entry_tasks)
}

/// Create a span covering one cache reclamation run
pub fn cleanup_span(cache_name: &str) -> Span {
    span!(Level::DEBUG, "cache_cleanup", cache_name = %cache_name)
}
