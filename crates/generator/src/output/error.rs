//! Error — failures that make a single output unrenderable.

use thiserror::Error;

use crate::spec::{Collector, OutputType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Output {output}: {feature} requires a secret, but none is referenced")]
    MissingSecret { output: String, feature: String },

    #[error("Output {output}: secret {secret:?} is missing required key {key:?}")]
    MissingSecretKey {
        output: String,
        secret: String,
        key: String,
    },

    #[error("Output {output}: secret key {key:?} is not valid UTF-8 and cannot be embedded")]
    SecretNotUtf8 { output: String, key: String },

    #[error("Output {output}: type {output_type} is not supported by the {collector} collector")]
    Unsupported {
        output: String,
        output_type: OutputType,
        collector: Collector,
    },

    #[error("Output {output}: {reason}")]
    InvalidSpec { output: String, reason: String },
}

impl RenderError {
    /// Name of the output the error belongs to.
    pub fn output(&self) -> &str {
        match self {
            RenderError::MissingSecret { output, .. }
            | RenderError::MissingSecretKey { output, .. }
            | RenderError::SecretNotUtf8 { output, .. }
            | RenderError::Unsupported { output, .. }
            | RenderError::InvalidSpec { output, .. } => output,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
