use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging to stderr so stdout stays machine-readable.
///
/// `RUST_LOG` selects the level (default: info), e.g.
/// `RUST_LOG=betonlab_core=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Verbose logging routed through the test harness.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
