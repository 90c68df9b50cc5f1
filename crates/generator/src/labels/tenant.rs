//! Tenant — dotted tenant-key path for multi-tenant Loki routing.

use crate::helpers::{escape_dollar_signs, quote};
use crate::spec::Loki;

/// Path segments of a configured tenant key, e.g. `["kubernetes", "namespace_name"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantKeyPath {
    segments: Vec<String>,
}

impl TenantKeyPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Fluentd record accessor, `$.a.b`, or `$['a']['b-c']` when a segment
    /// is not a plain word.
    pub fn fluentd_accessor(&self) -> String {
        let plain = self
            .segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        if plain {
            format!("$.{}", self.segments.join("."))
        } else {
            let brackets: String = self
                .segments
                .iter()
                .map(|s| format!("['{}']", s.replace('\\', "\\\\").replace('\'', "\\'")))
                .collect();
            format!("${}", brackets)
        }
    }

    /// Quoted Vector template: `"{{ a.b }}"`.
    pub fn vector_template(&self) -> String {
        quote(&format!(
            "{{{{ {} }}}}",
            escape_dollar_signs(&self.segments.join("."))
        ))
    }
}

/// Split the configured tenant key on dots.
///
/// `None` when no tenant key is configured, meaning no explicit tenant routing.
pub fn resolve_tenant_key_path(loki: Option<&Loki>) -> Option<TenantKeyPath> {
    let tenant_key = loki?.tenant_key.as_deref()?;
    if tenant_key.is_empty() {
        return None;
    }
    Some(TenantKeyPath {
        segments: tenant_key.split('.').map(String::from).collect(),
    })
}
