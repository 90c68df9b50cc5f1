//! Document — a local forwarding document: outputs, their inputs, and secrets.
//!
//! ```toml
//! [[outputs]]
//! name = "loki-east"
//! type = "loki"
//! url = "https://loki.example.com"
//! inputs = ["application"]
//! secret = { name = "loki-secret" }
//!
//! [secrets.loki-secret]
//! username = "admin"
//! password = "hunter2"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::helpers::{make_output_id, trim_spaces};
use crate::output::RenderRequest;
use crate::spec::{OutputSpec, SecretBundle};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwarderDocument {
    #[serde(default)]
    pub outputs: Vec<DocumentOutput>,
    #[serde(default)]
    pub secrets: BTreeMap<String, SecretBundle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentOutput {
    #[serde(flatten)]
    pub spec: OutputSpec,
    /// Pipelines feeding this output
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl ForwarderDocument {
    /// Load a document; `.json` files are JSON, anything else TOML.
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut doc: ForwarderDocument = if is_json {
            serde_json::from_str(&contents)?
        } else {
            toml::from_str(&contents)?
        };
        for output in &mut doc.outputs {
            output.inputs = trim_spaces(&output.inputs);
        }
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for output in &self.outputs {
            let name = &output.spec.name;
            if name.trim().is_empty() {
                return Err("output name must not be empty".to_string());
            }
            // Names that normalize to the same id would collide in one config.
            if !seen.insert(make_output_id(name)) {
                return Err(format!("duplicate output name '{}'", name));
            }
            if output.inputs.iter().all(|i| i.is_empty()) {
                return Err(format!("output '{}' has no inputs", name));
            }
        }
        Ok(())
    }

    /// Pair each output with its secret bundle, if the document carries it.
    pub fn requests(&self) -> Vec<RenderRequest<'_>> {
        self.outputs
            .iter()
            .map(|output| {
                let secret = output.spec.secret_name().and_then(|name| {
                    let bundle = self.secrets.get(name);
                    if bundle.is_none() {
                        tracing::warn!(output = %output.spec.name, "Secret '{}' not found in document", name);
                    }
                    bundle
                });
                RenderRequest {
                    spec: &output.spec,
                    pipelines: &output.inputs,
                    secret,
                }
            })
            .collect()
    }
}
