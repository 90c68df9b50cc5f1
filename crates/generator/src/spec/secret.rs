//! Secret — resolved secret material keyed by well-known names.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Shared key for Azure Monitor Logs.
pub const SHARED_KEY: &str = "shared_key";
/// PEM client certificate for mutual TLS.
pub const CLIENT_CERT_KEY: &str = "tls.crt";
/// PEM client private key for mutual TLS.
pub const CLIENT_PRIVATE_KEY: &str = "tls.key";
/// PEM bundle of CAs trusted when verifying the server.
pub const TRUSTED_CA_BUNDLE_KEY: &str = "ca-bundle.crt";
/// Passphrase protecting the client private key.
pub const PASSPHRASE: &str = "passphrase";
/// Splunk HEC token.
pub const SPLUNK_HEC_TOKEN: &str = "hecToken";
pub const CLIENT_USERNAME: &str = "username";
pub const CLIENT_PASSWORD: &str = "password";

/// Raw secret values for one output.
///
/// A missing key means the feature it backs is disabled. `Debug` lists key
/// names only, never values.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct SecretBundle {
    data: BTreeMap<String, Vec<u8>>,
}

impl SecretBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<BTreeMap<String, String>> for SecretBundle {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            data: map.into_iter().map(|(k, v)| (k, v.into_bytes())).collect(),
        }
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}
