//! Loki — Vector `loki` sink and Fluentd `loki` match block.
//!
//! The label key set is resolved once per render and handed to every
//! fragment that needs it, so the Fluentd filter and `<label>` block can
//! never disagree.

use super::error::{RenderError, RenderResult};
use super::{is_secure_url, tls, OutputContext};
use crate::helpers::{escape_dollar_signs, make_inputs, quote};
use crate::labels::{
    render_filter_fragment, render_label_fragment, render_vector_labels, resolve_label_keys,
    resolve_tenant_key_path,
};
use crate::spec::secret::{CLIENT_PASSWORD, CLIENT_USERNAME, PASSPHRASE};
use crate::spec::{Loki, TlsMaterial};

const BASIC_AUTH_FEATURE: &str = "basic authentication";

pub(crate) fn vector(ctx: &OutputContext<'_>, loki: &Loki) -> RenderResult<String> {
    let endpoint = ctx.required_url()?;
    let auth = basic_auth(ctx)?;
    let client_tls = tls::resolve(ctx, ctx.options.tls_material)?;
    let keys = resolve_label_keys(Some(loki));
    let tenant = resolve_tenant_key_path(Some(loki));

    let mut b = String::new();
    b.push_str(&ctx.sink_header(None));
    b.push_str("type = \"loki\"\n");
    b.push_str(&format!("inputs = {}\n", make_inputs(ctx.inputs)));
    b.push_str(&format!("endpoint = {}\n", quote(&escape_dollar_signs(endpoint))));
    b.push_str("out_of_order_action = \"accept\"\n");
    if let Some(tenant) = &tenant {
        b.push_str(&format!("tenant_id = {}\n", tenant.vector_template()));
    }

    b.push('\n');
    b.push_str(&ctx.sink_header(Some("encoding")));
    b.push_str("codec = \"json\"\n");

    b.push('\n');
    b.push_str(&ctx.sink_header(Some("labels")));
    b.push_str(&render_vector_labels(&keys));

    if auth.is_some() {
        let username = ctx.required_escaped_secret(CLIENT_USERNAME, BASIC_AUTH_FEATURE)?;
        let password = ctx.required_escaped_secret(CLIENT_PASSWORD, BASIC_AUTH_FEATURE)?;
        b.push('\n');
        b.push_str(&ctx.sink_header(Some("auth")));
        b.push_str("strategy = \"basic\"\n");
        b.push_str(&format!("user = {}\n", quote(&username)));
        b.push_str(&format!("password = {}\n", quote(&password)));
    }

    b.push_str(&tls::vector_stanza(ctx, &client_tls, is_secure_url(endpoint)));
    Ok(b)
}

pub(crate) fn fluentd(ctx: &OutputContext<'_>, loki: &Loki) -> RenderResult<String> {
    let endpoint = ctx.required_url()?;
    let auth = basic_auth(ctx)?;
    if ctx.has_secret(PASSPHRASE) {
        return Err(RenderError::InvalidSpec {
            output: ctx.output_name().to_string(),
            reason: "the fluentd loki plugin cannot load a passphrase-protected client key".to_string(),
        });
    }
    let client_tls = tls::resolve(ctx, TlsMaterial::Mounted)?;
    let keys = resolve_label_keys(Some(loki));
    let tenant = resolve_tenant_key_path(Some(loki));

    let mut b = String::new();
    b.push_str(&format!("<label @{}>\n", ctx.id.to_uppercase()));
    b.push_str("  <filter **>\n");
    b.push_str("    @type record_modifier\n");
    b.push_str("    <record>\n");
    b.push_str(&render_filter_fragment(&keys));
    b.push_str("    </record>\n");
    b.push_str("  </filter>\n");
    b.push_str("  <match **>\n");
    b.push_str("    @type loki\n");
    b.push_str(&format!("    @id {}\n", ctx.id));
    b.push_str("    line_format json\n");
    b.push_str(&format!("    url {}\n", endpoint));
    if let Some(secret) = auth {
        b.push_str(&format!("    username {}\n",
            ruby_read_secret_file(&ctx.options.secret_path(secret, CLIENT_USERNAME))
        ));
        b.push_str(&format!("    password {}\n",
            ruby_read_secret_file(&ctx.options.secret_path(secret, CLIENT_PASSWORD))
        ));
    }
    b.push_str(&tls::fluentd_lines(&client_tls));
    if let Some(tenant) = &tenant {
        b.push_str(&format!("    tenant ${{{}}}\n", tenant.fluentd_accessor()));
    }
    b.push_str("    <label>\n");
    b.push_str(&render_label_fragment(&keys));
    b.push_str("    </label>\n");
    match &tenant {
        Some(tenant) => {
            b.push_str(&format!("    <buffer {}>\n", tenant.fluentd_accessor()));
        }
        None => b.push_str("    <buffer>\n"),
    }
    b.push_str("      @type file\n");
    b.push_str(&format!("      path '/var/lib/fluentd/{}'\n", ctx.id));
    b.push_str("      flush_mode interval\n");
    b.push_str("      flush_interval 1s\n");
    b.push_str("      flush_thread_count 2\n");
    b.push_str("      retry_type exponential_backoff\n");
    b.push_str("      retry_max_interval 60s\n");
    b.push_str("      overflow_action block\n");
    b.push_str("    </buffer>\n");
    b.push_str("  </match>\n");
    b.push_str("</label>\n");
    Ok(b)
}

/// Secret name when basic auth is configured, `None` when it is not.
///
/// A username without a password (or the reverse) is an error.
fn basic_auth<'a>(ctx: &OutputContext<'a>) -> RenderResult<Option<&'a str>> {
    let has_user = ctx.has_secret(CLIENT_USERNAME);
    let has_pass = ctx.has_secret(CLIENT_PASSWORD);
    match (has_user, has_pass) {
        (false, false) => Ok(None),
        (true, false) => Err(ctx.missing_key_error(CLIENT_PASSWORD, BASIC_AUTH_FEATURE)),
        (false, true) => Err(ctx.missing_key_error(CLIENT_USERNAME, BASIC_AUTH_FEATURE)),
        (true, true) => ctx.secret_name(BASIC_AUTH_FEATURE).map(Some),
    }
}

// Fluentd evaluates the embedded Ruby at startup, so the value never lands in
// the config file.
fn ruby_read_secret_file(path: &str) -> String {
    let path = path.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "\"#{{File.exist?('{path}') ? open('{path}','r') do |f|f.read end : ''}}\"",
        path = path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::*;
    use crate::output::render;
    use crate::spec::secret::{CLIENT_CERT_KEY, CLIENT_PRIVATE_KEY, TRUSTED_CA_BUNDLE_KEY};
    use crate::spec::{Collector, OutputSpec, OutputTypeSpec, RenderOptions, SecretBundle, TlsProfile};

    fn loki_spec(loki: Loki) -> OutputSpec {
        with_url(
            output("loki-receiver", OutputTypeSpec::Loki(loki)),
            "https://logs-us-west1.grafana.net",
        )
    }

    fn render_loki(
        spec: &OutputSpec,
        bundle: Option<&SecretBundle>,
        collector: Collector,
    ) -> Result<String, RenderError> {
        render(
            "output_loki_receiver",
            spec,
            &inputs(),
            bundle,
            &TlsProfile::default(),
            &RenderOptions::for_collector(collector),
        )
    }

    #[test]
    fn test_vector_default_labels() {
        let conf = render_loki(&loki_spec(Loki::default()), None, Collector::Vector).expect("render");
        let expected = r#"[sinks.output_loki_receiver]
type = "loki"
inputs = ["pipelineName"]
endpoint = "https://logs-us-west1.grafana.net"
out_of_order_action = "accept"

[sinks.output_loki_receiver.encoding]
codec = "json"

[sinks.output_loki_receiver.labels]
kubernetes_container_name = "{{ kubernetes.container_name }}"
kubernetes_host = "${VECTOR_SELF_NODE_NAME}"
kubernetes_namespace_name = "{{ kubernetes.namespace_name }}"
kubernetes_pod_name = "{{ kubernetes.pod_name }}"
log_type = "{{ log_type }}"
tag = "{{ source_type }}"
"#;
        assert_eq!(conf, expected);
        parse_toml(&conf);
    }

    #[test]
    fn test_vector_tenant_and_basic_auth() {
        let spec = with_secret(
            loki_spec(Loki {
                label_keys: Some(vec!["kubernetes.labels.app".to_string()]),
                tenant_key: Some("kubernetes.namespace_name".to_string()),
            }),
            "loki-secret",
        );
        let bundle = SecretBundle::new()
            .with(CLIENT_USERNAME, "admin")
            .with(CLIENT_PASSWORD, "pa$$word");
        let conf = render_loki(&spec, Some(&bundle), Collector::Vector).expect("render");
        assert!(conf.contains("tenant_id = \"{{ kubernetes.namespace_name }}\"\n"));
        assert!(conf.contains(
            "[sinks.output_loki_receiver.auth]\nstrategy = \"basic\"\nuser = \"admin\"\npassword = \"pa$$$$word\"\n"
        ));
        let table = parse_toml(&conf);
        let labels = table["sinks"]["output_loki_receiver"]["labels"]
            .as_table()
            .expect("labels table");
        let names: Vec<&str> = labels.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["kubernetes_host", "kubernetes_labels_app", "tag"]);
    }

    #[test]
    fn test_username_without_password_is_error() {
        let spec = with_secret(loki_spec(Loki::default()), "loki-secret");
        let bundle = SecretBundle::new().with(CLIENT_USERNAME, "admin");
        for collector in [Collector::Vector, Collector::Fluentd] {
            let err = render_loki(&spec, Some(&bundle), collector).unwrap_err();
            assert!(
                matches!(err, RenderError::MissingSecretKey { ref key, .. } if key == CLIENT_PASSWORD),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn test_fluentd_default_labels() {
        let conf = render_loki(&loki_spec(Loki::default()), None, Collector::Fluentd).expect("render");
        let expected = r##"<label @OUTPUT_LOKI_RECEIVER>
  <filter **>
    @type record_modifier
    <record>
      _kubernetes_container_name ${record.dig("kubernetes","container_name")}
      _kubernetes_host "#{ENV['NODE_NAME']}"
      _kubernetes_namespace_name ${record.dig("kubernetes","namespace_name")}
      _kubernetes_pod_name ${record.dig("kubernetes","pod_name")}
      _log_type ${record.dig("log_type")}
      _tag ${tag}
    </record>
  </filter>
  <match **>
    @type loki
    @id output_loki_receiver
    line_format json
    url https://logs-us-west1.grafana.net
    <label>
      kubernetes_container_name _kubernetes_container_name
      kubernetes_host _kubernetes_host
      kubernetes_namespace_name _kubernetes_namespace_name
      kubernetes_pod_name _kubernetes_pod_name
      log_type _log_type
      tag _tag
    </label>
    <buffer>
      @type file
      path '/var/lib/fluentd/output_loki_receiver'
      flush_mode interval
      flush_interval 1s
      flush_thread_count 2
      retry_type exponential_backoff
      retry_max_interval 60s
      overflow_action block
    </buffer>
  </match>
</label>
"##;
        assert_eq!(conf, expected);
    }

    #[test]
    fn test_fluentd_tenant_auth_and_tls() {
        let spec = with_tls(
            with_secret(
                loki_spec(Loki {
                    label_keys: None,
                    tenant_key: Some("kubernetes.namespace_name".to_string()),
                }),
                "loki-secret",
            ),
            false,
            true,
        );
        let bundle = SecretBundle::new()
            .with(CLIENT_USERNAME, "admin")
            .with(CLIENT_PASSWORD, "secret")
            .with(CLIENT_CERT_KEY, "cert")
            .with(CLIENT_PRIVATE_KEY, "key")
            .with(TRUSTED_CA_BUNDLE_KEY, "ca");
        let conf = render_loki(&spec, Some(&bundle), Collector::Fluentd).expect("render");
        assert!(conf.contains(
            "    username \"#{File.exist?('/var/run/ocp-collector/secrets/loki-secret/username') ? open('/var/run/ocp-collector/secrets/loki-secret/username','r') do |f|f.read end : ''}\"\n"
        ), "{}", conf);
        assert!(!conf.contains("admin"));
        assert!(!conf.contains("secret\n"));
        assert!(conf.contains("    ca_cert /var/run/ocp-collector/secrets/loki-secret/ca-bundle.crt\n"));
        assert!(conf.contains("    cert /var/run/ocp-collector/secrets/loki-secret/tls.crt\n"));
        assert!(conf.contains("    key /var/run/ocp-collector/secrets/loki-secret/tls.key\n"));
        assert!(conf.contains("    tenant ${$.kubernetes.namespace_name}\n"));
        assert!(conf.contains("    <buffer $.kubernetes.namespace_name>\n"));
    }

    #[test]
    fn test_fluentd_rejects_passphrase() {
        let spec = with_secret(loki_spec(Loki::default()), "loki-secret");
        let bundle = SecretBundle::new()
            .with(CLIENT_CERT_KEY, "cert")
            .with(CLIENT_PRIVATE_KEY, "key")
            .with(PASSPHRASE, "foo");
        let err = render_loki(&spec, Some(&bundle), Collector::Fluentd).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSpec { .. }), "{:?}", err);
    }

    #[test]
    fn test_fluentd_filter_and_label_agree_for_overrides() {
        let spec = loki_spec(Loki {
            label_keys: Some(vec!["kubernetes.labels.app".to_string(), "kubernetes.pod_name".to_string()]),
            tenant_key: None,
        });
        let conf = render_loki(&spec, None, Collector::Fluentd).expect("render");
        let record_start = conf.find("<record>").expect("record block");
        let record_end = conf.find("</record>").expect("record end");
        let label_start = conf.find("    <label>").expect("label block");
        let label_end = conf.find("    </label>").expect("label end");
        let populated: Vec<&str> = conf[record_start..record_end]
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        let consumed: Vec<&str> = conf[label_start..label_end]
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().nth(1))
            .collect();
        assert_eq!(populated, vec!["_kubernetes_host", "_kubernetes_labels_app", "_kubernetes_pod_name", "_tag"]);
        assert_eq!(populated, consumed);
    }

    #[test]
    fn test_concurrent_renders_are_identical() {
        let spec = loki_spec(Loki {
            label_keys: Some(vec!["kubernetes.labels.app".to_string()]),
            tenant_key: Some("kubernetes.namespace_name".to_string()),
        });
        let baseline = render_loki(&spec, None, Collector::Fluentd).expect("render");
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| render_loki(&spec, None, Collector::Fluentd)))
                .collect();
            for handle in handles {
                let conf = handle.join().expect("join").expect("render");
                assert_eq!(conf, baseline);
            }
        });
    }
}
