//! Options — collector selection and cluster-wide TLS tuning for a render call.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SECRETS_MOUNT_DIR: &str = "/var/run/ocp-collector/secrets";

/// Downstream collector whose configuration format is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collector {
    /// TOML `[sinks.<id>]` tables
    #[default]
    Vector,
    /// `<label>` / `<filter>` / `<match>` directives
    Fluentd,
}

impl Collector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collector::Vector => "vector",
            Collector::Fluentd => "fluentd",
        }
    }
}

impl fmt::Display for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vector" => Ok(Collector::Vector),
            "fluentd" => Ok(Collector::Fluentd),
            other => Err(format!("unknown collector '{}', expected vector or fluentd", other)),
        }
    }
}

/// Where TLS certificate and key material is read from by the collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMaterial {
    /// Reference files the secret is mounted as, under the secrets mount dir.
    #[default]
    Mounted,
    /// Embed the PEM values in the generated config.
    Inline,
}

/// Per-call rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub collector: Collector,
    pub secrets_mount_dir: String,
    pub tls_material: TlsMaterial,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            collector: Collector::Vector,
            secrets_mount_dir: DEFAULT_SECRETS_MOUNT_DIR.to_string(),
            tls_material: TlsMaterial::Mounted,
        }
    }
}

impl RenderOptions {
    pub fn for_collector(collector: Collector) -> Self {
        Self {
            collector,
            ..Self::default()
        }
    }

    /// Path the collector sees for `key` of the named secret.
    pub fn secret_path(&self, secret_name: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.secrets_mount_dir.trim_end_matches('/'),
            secret_name,
            key
        )
    }
}

/// Cluster TLS security profile applied to every TLS stanza.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsProfile {
    pub min_tls_version: Option<String>,
    pub ciphers: Vec<String>,
}

impl TlsProfile {
    pub fn is_empty(&self) -> bool {
        self.min_tls_version.is_none() && self.ciphers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_path_joins_segments() {
        let opts = RenderOptions::default();
        assert_eq!(
            opts.secret_path("azure-monitor-secret-tls", "tls.key"),
            "/var/run/ocp-collector/secrets/azure-monitor-secret-tls/tls.key"
        );
    }

    #[test]
    fn test_secret_path_trailing_slash() {
        let opts = RenderOptions {
            secrets_mount_dir: "/secrets/".to_string(),
            ..RenderOptions::default()
        };
        assert_eq!(opts.secret_path("s", "ca-bundle.crt"), "/secrets/s/ca-bundle.crt");
    }

    #[test]
    fn test_collector_from_str() {
        assert_eq!("Vector".parse::<Collector>(), Ok(Collector::Vector));
        assert_eq!("fluentd".parse::<Collector>(), Ok(Collector::Fluentd));
        assert!("logstash".parse::<Collector>().is_err());
    }

    #[test]
    fn test_tls_profile_empty() {
        assert!(TlsProfile::default().is_empty());
        let profile = TlsProfile {
            min_tls_version: Some("VersionTLS12".to_string()),
            ciphers: vec![],
        };
        assert!(!profile.is_empty());
    }
}
