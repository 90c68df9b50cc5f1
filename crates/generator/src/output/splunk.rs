//! Splunk — `splunk_hec_logs` Vector sink.

use super::error::RenderResult;
use super::{is_secure_url, tls, OutputContext};
use crate::helpers::{escape_dollar_signs, make_inputs, quote};
use crate::spec::secret::SPLUNK_HEC_TOKEN;
use crate::spec::Splunk;

pub(crate) fn vector(ctx: &OutputContext<'_>, splunk: &Splunk) -> RenderResult<String> {
    let endpoint = ctx.required_url()?;
    let token = ctx.required_escaped_secret(SPLUNK_HEC_TOKEN, "splunk HEC token")?;
    let client_tls = tls::resolve(ctx, ctx.options.tls_material)?;

    let mut b = String::new();
    b.push_str(&ctx.sink_header(None));
    b.push_str("type = \"splunk_hec_logs\"\n");
    b.push_str(&format!("inputs = {}\n", make_inputs(ctx.inputs)));
    b.push_str(&format!("endpoint = {}\n", quote(&escape_dollar_signs(endpoint))));
    b.push_str("compression = \"none\"\n");
    b.push_str(&format!("default_token = {}\n", quote(&token)));
    if let Some(index) = index_value(splunk) {
        b.push_str(&format!("index = {}\n", index));
    }
    b.push_str("timestamp_key = \"@timestamp\"\n");
    b.push('\n');
    b.push_str(&ctx.sink_header(Some("encoding")));
    b.push_str("codec = \"json\"\n");
    b.push_str(&tls::vector_stanza(ctx, &client_tls, is_secure_url(endpoint)));
    Ok(b)
}

// A record-derived index wins over a fixed one.
fn index_value(splunk: &Splunk) -> Option<String> {
    let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    if let Some(key) = non_empty(&splunk.index_key) {
        return Some(quote(&format!("{{{{ {} }}}}", escape_dollar_signs(&key))));
    }
    non_empty(&splunk.index_name).map(|name| quote(&escape_dollar_signs(&name)))
}
