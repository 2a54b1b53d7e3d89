// src/logging.rs
use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Install the global subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_logging(json: bool, default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| anyhow::anyhow!("Invalid log directive '{}': {}", default_directive, e))?;

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays clean for report output
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
