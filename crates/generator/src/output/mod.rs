//! Output module — per-output fragment assembly for each collector.
//!
//! [`render`] picks the assembler for the output's type and the target
//! collector, then the assembler composes the normalized id, escaped secret
//! values, TLS stanza and label fragments into one block.

pub mod error;
pub mod tls;
pub mod azuremonitor;
pub mod splunk;
pub mod loki;
pub mod metrics;
pub mod batch;

pub use batch::{render_batch, BatchReport, RenderRequest, RenderedOutput};
pub use error::{RenderError, RenderResult};
pub use metrics::render_metrics_exporter;

use crate::helpers::{escape_dollar_signs, toml_key};
use crate::spec::{Collector, OutputSpec, OutputTypeSpec, RenderOptions, SecretBundle, TlsProfile};

/// Render one output as a complete configuration fragment.
///
/// `id` is the normalized component id (see [`crate::helpers::make_output_id`]),
/// `pipeline_names` the upstream components feeding it. Inputs are only read.
pub fn render(
    id: &str,
    spec: &OutputSpec,
    pipeline_names: &[String],
    secret: Option<&SecretBundle>,
    tls_profile: &TlsProfile,
    options: &RenderOptions,
) -> RenderResult<String> {
    let ctx = OutputContext {
        id,
        spec,
        inputs: pipeline_names,
        secret,
        tls_profile,
        options,
    };

    tracing::debug!(
        output = %spec.name,
        id,
        output_type = %spec.output_type(),
        collector = %options.collector,
        "Rendering output"
    );

    match (&spec.type_spec, options.collector) {
        (OutputTypeSpec::AzureMonitor(azure), Collector::Vector) => azuremonitor::vector(&ctx, azure),
        (OutputTypeSpec::Splunk(splunk), Collector::Vector) => splunk::vector(&ctx, splunk),
        (OutputTypeSpec::Loki(loki_spec), Collector::Vector) => loki::vector(&ctx, loki_spec),
        (OutputTypeSpec::Loki(loki_spec), Collector::Fluentd) => loki::fluentd(&ctx, loki_spec),
        (OutputTypeSpec::AzureMonitor(_) | OutputTypeSpec::Splunk(_), Collector::Fluentd) => {
            Err(RenderError::Unsupported {
                output: spec.name.clone(),
                output_type: spec.output_type(),
                collector: options.collector,
            })
        }
    }
}

/// Everything one assembler needs, borrowed from the caller.
pub(crate) struct OutputContext<'a> {
    pub id: &'a str,
    pub spec: &'a OutputSpec,
    pub inputs: &'a [String],
    pub secret: Option<&'a SecretBundle>,
    pub tls_profile: &'a TlsProfile,
    pub options: &'a RenderOptions,
}

impl<'a> OutputContext<'a> {
    /// `[sinks.<id>]` or `[sinks.<id>.<child>]` header line. Ids that are not
    /// bare TOML keys are quoted.
    pub fn sink_header(&self, child: Option<&str>) -> String {
        match child {
            Some(child) => format!("[sinks.{}.{}]\n", toml_key(&escape_dollar_signs(self.id)), child),
            None => format!("[sinks.{}]\n", toml_key(&escape_dollar_signs(self.id))),
        }
    }

    pub fn output_name(&self) -> &str {
        &self.spec.name
    }

    pub fn has_secret(&self, key: &str) -> bool {
        self.secret.is_some_and(|s| s.contains(key))
    }

    /// Secret value as text, `None` when the key is absent.
    pub fn secret_text(&self, key: &str) -> RenderResult<Option<&'a str>> {
        let Some(raw) = self.secret.and_then(|s| s.get(key)) else {
            return Ok(None);
        };
        std::str::from_utf8(raw)
            .map(Some)
            .map_err(|_| RenderError::SecretNotUtf8 {
                output: self.spec.name.clone(),
                key: key.to_string(),
            })
    }

    /// Secret value escaped for embedding, `None` when the key is absent.
    pub fn escaped_secret(&self, key: &str) -> RenderResult<Option<String>> {
        Ok(self.secret_text(key)?.map(escape_dollar_signs))
    }

    /// Secret value escaped for embedding; absence is an error.
    pub fn required_escaped_secret(&self, key: &str, feature: &str) -> RenderResult<String> {
        self.escaped_secret(key)?
            .ok_or_else(|| self.missing_key_error(key, feature))
    }

    /// Name of the referenced secret, required to locate mounted files.
    pub fn secret_name(&self, feature: &str) -> RenderResult<&'a str> {
        self.spec
            .secret_name()
            .ok_or_else(|| RenderError::MissingSecret {
                output: self.spec.name.clone(),
                feature: feature.to_string(),
            })
    }

    pub fn missing_key_error(&self, key: &str, feature: &str) -> RenderError {
        match self.spec.secret_name() {
            Some(secret) => RenderError::MissingSecretKey {
                output: self.spec.name.clone(),
                secret: secret.to_string(),
                key: key.to_string(),
            },
            None => RenderError::MissingSecret {
                output: self.spec.name.clone(),
                feature: feature.to_string(),
            },
        }
    }

    /// The output URL; URL-based outputs cannot render without one.
    pub fn required_url(&self) -> RenderResult<&'a str> {
        match self.spec.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(RenderError::InvalidSpec {
                output: self.spec.name.clone(),
                reason: format!("{} output requires a url", self.spec.output_type()),
            }),
        }
    }
}

/// Whether a URL talks TLS.
pub(crate) fn is_secure_url(url: &str) -> bool {
    url.get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}
