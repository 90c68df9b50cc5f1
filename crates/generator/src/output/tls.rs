//! TLS — client TLS material resolution and the per-collector TLS stanzas.
//!
//! Mutual-TLS settings are only emitted when the secret bundle carries the
//! material. A half-configured pair, a passphrase without a key, or
//! `clientAuth` without material is rejected instead of producing an
//! insecure or unloadable fragment.

use super::error::RenderResult;
use super::OutputContext;
use crate::helpers::{escape_dollar_signs, quote};
use crate::spec::secret::{CLIENT_CERT_KEY, CLIENT_PRIVATE_KEY, PASSPHRASE, TRUSTED_CA_BUNDLE_KEY};
use crate::spec::TlsMaterial;

const MTLS_FEATURE: &str = "mutual TLS";

/// How the collector gets at one piece of PEM material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Material {
    /// Path of the mounted secret file
    File(String),
    /// PEM text, escaped for embedding
    Inline(String),
}

impl Material {
    fn toml_value(&self) -> String {
        match self {
            Material::File(path) => quote(&escape_dollar_signs(path)),
            Material::Inline(pem) => quote(pem),
        }
    }
}

/// Resolved TLS settings for one output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTls {
    pub cert: Option<Material>,
    pub key: Option<Material>,
    pub ca: Option<Material>,
    /// Escaped passphrase for the private key
    pub key_pass: Option<String>,
    pub insecure_skip_verify: bool,
}

impl ClientTls {
    pub fn is_mutual(&self) -> bool {
        self.cert.is_some() && self.key.is_some()
    }

    fn is_empty(&self) -> bool {
        self.cert.is_none()
            && self.key.is_none()
            && self.ca.is_none()
            && self.key_pass.is_none()
            && !self.insecure_skip_verify
    }
}

/// Resolve TLS settings from the output spec and its secret bundle.
pub(crate) fn resolve(ctx: &OutputContext<'_>, material: TlsMaterial) -> RenderResult<ClientTls> {
    let tls_spec = ctx.spec.tls.clone().unwrap_or_default();

    let has_cert = ctx.has_secret(CLIENT_CERT_KEY);
    let has_key = ctx.has_secret(CLIENT_PRIVATE_KEY);
    let has_pass = ctx.has_secret(PASSPHRASE);

    if tls_spec.client_auth && !has_cert {
        return Err(ctx.missing_key_error(CLIENT_CERT_KEY, MTLS_FEATURE));
    }
    if has_cert && !has_key {
        return Err(ctx.missing_key_error(CLIENT_PRIVATE_KEY, MTLS_FEATURE));
    }
    if has_key && !has_cert {
        return Err(ctx.missing_key_error(CLIENT_CERT_KEY, MTLS_FEATURE));
    }
    if has_pass && !has_key {
        return Err(ctx.missing_key_error(CLIENT_PRIVATE_KEY, MTLS_FEATURE));
    }

    let resolve_material = |key: &str| -> RenderResult<Option<Material>> {
        if !ctx.has_secret(key) {
            return Ok(None);
        }
        match material {
            TlsMaterial::Mounted => {
                let secret = ctx.secret_name("mounted TLS material")?;
                Ok(Some(Material::File(ctx.options.secret_path(secret, key))))
            }
            TlsMaterial::Inline => Ok(ctx.escaped_secret(key)?.map(Material::Inline)),
        }
    };

    let tls = ClientTls {
        cert: resolve_material(CLIENT_CERT_KEY)?,
        key: resolve_material(CLIENT_PRIVATE_KEY)?,
        ca: resolve_material(TRUSTED_CA_BUNDLE_KEY)?,
        key_pass: ctx.escaped_secret(PASSPHRASE)?,
        insecure_skip_verify: tls_spec.insecure_skip_verify,
    };

    if tls.is_mutual() {
        tracing::debug!(output = %ctx.output_name(), "Client certificate configured");
    }
    Ok(tls)
}

/// `[sinks.<id>.tls]` table, or an empty string when there is nothing to set.
///
/// The cluster TLS profile applies only when the endpoint talks TLS.
pub(crate) fn vector_stanza(ctx: &OutputContext<'_>, tls: &ClientTls, secure_endpoint: bool) -> String {
    let profile = ctx.tls_profile;
    let apply_profile = secure_endpoint && !profile.is_empty();
    if tls.is_empty() && !apply_profile {
        return String::new();
    }

    let mut b = String::new();
    b.push('\n');
    b.push_str(&ctx.sink_header(Some("tls")));
    if apply_profile {
        if let Some(version) = &profile.min_tls_version {
            b.push_str(&format!("min_tls_version = {}\n", quote(&escape_dollar_signs(version))));
        }
        if !profile.ciphers.is_empty() {
            let ciphers = escape_dollar_signs(&profile.ciphers.join(","));
            b.push_str(&format!("ciphersuites = {}\n", quote(&ciphers)));
        }
    }
    if let Some(key) = &tls.key {
        b.push_str(&format!("key_file = {}\n", key.toml_value()));
    }
    if let Some(cert) = &tls.cert {
        b.push_str(&format!("crt_file = {}\n", cert.toml_value()));
    }
    if let Some(ca) = &tls.ca {
        b.push_str(&format!("ca_file = {}\n", ca.toml_value()));
    }
    if let Some(pass) = &tls.key_pass {
        b.push_str(&format!("key_pass = {}\n", quote(pass)));
    }
    if tls.insecure_skip_verify {
        b.push_str("verify_certificate = false\n");
        b.push_str("verify_hostname = false\n");
    }
    b
}

/// Fluentd Loki plugin TLS parameters, indented for a `<match>` block.
///
/// The plugin only reads material from files, so `tls` must have been
/// resolved with [`TlsMaterial::Mounted`].
pub(crate) fn fluentd_lines(tls: &ClientTls) -> String {
    let mut b = String::new();
    if let Some(Material::File(path)) = &tls.ca {
        b.push_str(&format!("    ca_cert {}\n", path));
    }
    if let Some(Material::File(path)) = &tls.cert {
        b.push_str(&format!("    cert {}\n", path));
    }
    if let Some(Material::File(path)) = &tls.key {
        b.push_str(&format!("    key {}\n", path));
    }
    if tls.insecure_skip_verify {
        b.push_str("    insecure_tls true\n");
    }
    b
}
