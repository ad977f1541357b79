use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise default non-JSON logging.
///
/// Filtering is configured with the `RUST_LOG` environment variable, defaulting to `INFO`. Use
/// `RUST_LOG=response_parser=debug` to also log every detected response failure.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// Initialise default JSON logging.
///
/// Filtering is configured with the `RUST_LOG` environment variable, defaulting to `INFO`.
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}

fn env_filter() -> tracing_subscriber::filter::EnvFilter {
    tracing_subscriber::filter::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy()
}
