//! Azure Monitor Logs — `azure_monitor_logs` Vector sink.

use super::error::RenderResult;
use super::{tls, OutputContext};
use crate::helpers::{escape_dollar_signs, make_inputs, quote};
use crate::spec::secret::SHARED_KEY;
use crate::spec::AzureMonitor;

pub(crate) fn vector(ctx: &OutputContext<'_>, azure: &AzureMonitor) -> RenderResult<String> {
    let shared_key = ctx.required_escaped_secret(SHARED_KEY, "azure monitor shared key")?;
    let client_tls = tls::resolve(ctx, ctx.options.tls_material)?;

    let mut b = String::new();
    b.push_str(&ctx.sink_header(None));
    b.push_str("type = \"azure_monitor_logs\"\n");
    b.push_str(&format!("inputs = {}\n", make_inputs(ctx.inputs)));
    if let Some(resource_id) = &azure.azure_resource_id {
        b.push_str(&format!("azure_resource_id = {}\n", quote(&escape_dollar_signs(resource_id))));
    }
    b.push_str(&format!("customer_id = {}\n", quote(&escape_dollar_signs(&azure.customer_id))));
    if let Some(host) = &azure.host {
        b.push_str(&format!("host = {}\n", quote(&escape_dollar_signs(host))));
    }
    b.push_str(&format!("log_type = {}\n", quote(&escape_dollar_signs(&azure.log_type))));
    b.push_str(&format!("shared_key = {}\n", quote(&shared_key)));

    // Log Analytics ingestion is always HTTPS.
    b.push_str(&tls::vector_stanza(ctx, &client_tls, true));
    Ok(b)
}
