//! Spec — the resolved forwarding inputs the generator renders from.

pub mod output;
pub mod secret;
pub mod options;

pub use output::{
    AzureMonitor, Loki, OutputSecretSpec, OutputSpec, OutputTlsSpec, OutputType, OutputTypeSpec,
    Splunk,
};
pub use secret::SecretBundle;
pub use options::{Collector, RenderOptions, TlsMaterial, TlsProfile};
