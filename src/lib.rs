pub mod app;
pub mod backend;
pub mod config;
pub mod controller;
pub mod render;
pub mod ui;

use tracing_subscriber::EnvFilter;

/// Install the log subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
