//! Boot — logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::GeneratorConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries the rendered configuration.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate the generator configuration.
pub fn boot() -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    info!("Starting collector config generator v{}", env!("CARGO_PKG_VERSION"));

    let config = GeneratorConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        "Loaded configuration: collector={}, secrets_mount_dir={}",
        config.collector, config.secrets_mount_dir
    );
    if let Some(port) = config.metrics_port {
        info!("Metrics exporter enabled on port {}", port);
    }
    Ok(config)
}
