//! Batch — render a set of independent outputs into one configuration.
//!
//! Each output is rendered on its own; a failure is recorded against that
//! output and the rest of the batch still renders.

use super::error::{RenderError, RenderResult};
use super::render;
use crate::helpers::make_output_id;
use crate::spec::{OutputSpec, RenderOptions, SecretBundle, TlsProfile};

/// One output together with the pipelines feeding it and its secret.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub spec: &'a OutputSpec,
    pub pipelines: &'a [String],
    pub secret: Option<&'a SecretBundle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub name: String,
    pub id: String,
    pub result: RenderResult<String>,
}

/// Per-output results, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outputs: Vec<RenderedOutput>,
}

impl BatchReport {
    /// Successful fragments joined by a blank line.
    pub fn config(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|fragment| fragment.trim_end_matches('\n'))
            .collect::<Vec<_>>()
            .join("\n\n")
            + "\n"
    }

    pub fn failures(&self) -> Vec<&RenderError> {
        self.outputs
            .iter()
            .filter_map(|o| o.result.as_ref().err())
            .collect()
    }

    pub fn is_ok(&self) -> bool {
        self.outputs.iter().all(|o| o.result.is_ok())
    }
}

pub fn render_batch(
    requests: &[RenderRequest<'_>],
    options: &RenderOptions,
    tls_profile: &TlsProfile,
) -> BatchReport {
    let outputs = requests
        .iter()
        .map(|req| {
            let id = make_output_id(&req.spec.name);
            let result = render(&id, req.spec, req.pipelines, req.secret, tls_profile, options);
            if let Err(e) = &result {
                tracing::warn!(output = %req.spec.name, "Skipping output: {}", e);
            }
            RenderedOutput {
                name: req.spec.name.clone(),
                id,
                result,
            }
        })
        .collect();

    let report = BatchReport { outputs };
    tracing::info!(
        "Rendered {} output(s), {} failed",
        report.outputs.len(),
        report.failures().len()
    );
    report
}
