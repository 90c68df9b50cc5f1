//! Conf module — generator configuration model, loading, and forwarding documents.

pub mod model;
pub mod load;
pub mod document;

pub use model::GeneratorConfig;
pub use document::{DocumentOutput, ForwarderDocument};
