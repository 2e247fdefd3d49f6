use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Installs the global tracing subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured targets if it is set.
pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let targets = rust_log.as_deref().unwrap_or(&config.targets);

    let layer = console_layer(config.style, make_env_filter(targets));
    let registry = Registry::default().with(layer);

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if rust_log.is_some() && std::env::var("SCRIBE_LOG_TARGETS").is_ok() {
        warn!("Both `RUST_LOG` and `SCRIBE_LOG_TARGETS` are set, `RUST_LOG` will be used to determine the logging targets");
    }

    Ok(())
}

/// Sets up tracing for tests, printing through the test harness
/// so output only shows up for failing tests. Calling it more than
/// once is harmless.
pub fn init_for_tests() {
    let targets = std::env::var("RUST_LOG").unwrap_or_default();
    let layer = fmt::layer()
        .with_test_writer()
        .with_filter(make_env_filter(&targets));

    let registry = Registry::default().with(layer);
    tracing::subscriber::set_global_default(registry).ok();
}

fn console_layer(style: LoggingStyle, filter: EnvFilter) -> Box<dyn Layer<Registry> + Send + Sync> {
    match style {
        LoggingStyle::Compact => fmt::layer().compact().with_filter(filter).boxed(),
        LoggingStyle::Full => fmt::layer().with_filter(filter).boxed(),
        LoggingStyle::Pretty => fmt::layer().pretty().with_filter(filter).boxed(),
    }
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
