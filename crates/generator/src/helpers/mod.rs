//! Helpers — identifier normalization, value quoting/escaping, listen address.

pub mod ident;
pub mod escape;
pub mod listen;

pub use escape::escape_dollar_signs;
pub use ident::{format_component_id, make_inputs, make_output_id, quote, toml_key, trim_spaces};
pub use listen::listen_on_all_local_interfaces_address;
