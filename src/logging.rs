use std::io;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the stdout subscriber. `RUST_LOG` overrides `default_filter`.
pub fn configure_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_target(true)
        .with_filter(filter);

    // A second call (tests, embedding binaries) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(stdout_log).try_init();
}
