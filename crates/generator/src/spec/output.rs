//! Output — OutputSpec and the per-type settings it carries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A configured log destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub name: String,
    #[serde(flatten)]
    pub type_spec: OutputTypeSpec,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tls: Option<OutputTlsSpec>,
    #[serde(default)]
    pub secret: Option<OutputSecretSpec>,
}

/// Backend type tag together with its type-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputTypeSpec {
    AzureMonitor(AzureMonitor),
    Loki(Loki),
    Splunk(Splunk),
}

/// Fieldless view of [`OutputTypeSpec`] for errors and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputType {
    AzureMonitor,
    Loki,
    Splunk,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::AzureMonitor => "azureMonitor",
            OutputType::Loki => "loki",
            OutputType::Splunk => "splunk",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutputTypeSpec {
    pub fn output_type(&self) -> OutputType {
        match self {
            OutputTypeSpec::AzureMonitor(_) => OutputType::AzureMonitor,
            OutputTypeSpec::Loki(_) => OutputType::Loki,
            OutputTypeSpec::Splunk(_) => OutputType::Splunk,
        }
    }
}

/// Azure Monitor Logs (Log Analytics HTTP data collector).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureMonitor {
    pub customer_id: String,
    pub log_type: String,
    #[serde(default)]
    pub azure_resource_id: Option<String>,
    /// Alternative ingestion host, e.g. for sovereign clouds
    #[serde(default)]
    pub host: Option<String>,
}

/// Grafana Loki.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loki {
    /// Record fields to surface as Loki labels. Unset or empty selects the defaults.
    #[serde(default)]
    pub label_keys: Option<Vec<String>>,
    /// Dotted record path whose value selects the Loki tenant.
    #[serde(default)]
    pub tenant_key: Option<String>,
}

/// Splunk HTTP Event Collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splunk {
    /// Dotted record path whose value selects the index.
    #[serde(default)]
    pub index_key: Option<String>,
    /// Fixed index name; ignored when `index_key` is set.
    #[serde(default)]
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTlsSpec {
    #[serde(default)]
    pub insecure_skip_verify: bool,
    /// Mutual TLS is required: the secret must carry a client certificate and key.
    #[serde(default)]
    pub client_auth: bool,
}

/// Reference to the secret holding this output's credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSecretSpec {
    pub name: String,
}

impl OutputSpec {
    pub fn output_type(&self) -> OutputType {
        self.type_spec.output_type()
    }

    pub fn secret_name(&self) -> Option<&str> {
        self.secret.as_ref().map(|s| s.name.as_str())
    }

    pub fn loki(&self) -> Option<&Loki> {
        match &self.type_spec {
            OutputTypeSpec::Loki(loki) => Some(loki),
            _ => None,
        }
    }
}
