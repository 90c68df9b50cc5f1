//! Labels — which record fields become backend labels, and the fragments that
//! extract and map them.

pub mod keys;
pub mod fragment;
pub mod tenant;

pub use keys::{resolve_label_keys, LabelKeySet, LABEL_KUBERNETES_HOST, LABEL_TAG};
pub use fragment::{render_filter_fragment, render_label_fragment, render_vector_labels, temp_name};
pub use tenant::{resolve_tenant_key_path, TenantKeyPath};
