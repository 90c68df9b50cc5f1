//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{GeneratorConfig, DEFAULT_CONFIG_FILE};

impl GeneratorConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("GENERATOR_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: GeneratorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            collector: std::env::var("GENERATOR_COLLECTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.collector),
            secrets_mount_dir: std::env::var("GENERATOR_SECRETS_DIR")
                .unwrap_or(defaults.secrets_mount_dir),
            tls_material: defaults.tls_material,
            min_tls_version: std::env::var("GENERATOR_MIN_TLS_VERSION").ok(),
            ciphers: std::env::var("GENERATOR_CIPHERS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
            metrics_port: std::env::var("GENERATOR_METRICS_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Apply the override variables. Unlike `from_env`, a malformed value is
    /// an error rather than silently ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(collector) = lookup("GENERATOR_COLLECTOR") {
            self.collector = collector.parse()?;
        }
        if let Some(dir) = lookup("GENERATOR_SECRETS_DIR") {
            self.secrets_mount_dir = dir;
        }
        if let Some(port) = lookup("GENERATOR_METRICS_PORT") {
            self.metrics_port = Some(
                port.parse()
                    .map_err(|e| format!("GENERATOR_METRICS_PORT '{}': {}", port, e))?,
            );
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
