//! Model — GeneratorConfig and its projections onto render inputs.

use serde::{Deserialize, Serialize};

use crate::spec::options::DEFAULT_SECRETS_MOUNT_DIR;
use crate::spec::{Collector, RenderOptions, TlsMaterial, TlsProfile};

pub const DEFAULT_CONFIG_FILE: &str = "/etc/logfwd/generator.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub collector: Collector,
    pub secrets_mount_dir: String,
    pub tls_material: TlsMaterial,
    /// Cluster TLS profile minimum version, e.g. `VersionTLS12`
    pub min_tls_version: Option<String>,
    pub ciphers: Vec<String>,
    /// Port for the collector's own metrics exporter; `None` disables it
    pub metrics_port: Option<u16>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            collector: Collector::Vector,
            secrets_mount_dir: DEFAULT_SECRETS_MOUNT_DIR.to_string(),
            tls_material: TlsMaterial::Mounted,
            min_tls_version: None,
            ciphers: Vec::new(),
            metrics_port: None,
        }
    }
}

impl GeneratorConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            collector: self.collector,
            secrets_mount_dir: self.secrets_mount_dir.clone(),
            tls_material: self.tls_material,
        }
    }

    pub fn tls_profile(&self) -> TlsProfile {
        TlsProfile {
            min_tls_version: self.min_tls_version.clone(),
            ciphers: self.ciphers.clone(),
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.secrets_mount_dir.trim().is_empty() {
            return Err("secrets_mount_dir must not be empty".to_string());
        }
        if self.metrics_port == Some(0) {
            return Err("metrics_port must be > 0".to_string());
        }
        if let Some(version) = &self.min_tls_version {
            if !version.starts_with("VersionTLS") {
                return Err(format!(
                    "min_tls_version must look like VersionTLS12, got '{}'",
                    version
                ));
            }
        }
        if self.ciphers.iter().any(|c| c.trim().is_empty() || c.contains(',')) {
            return Err("ciphers must be non-empty names without commas".to_string());
        }
        if self.collector == Collector::Fluentd && self.tls_material == TlsMaterial::Inline {
            return Err("tls_material = inline is only supported by the vector collector".to_string());
        }
        Ok(())
    }
}
