//! Fragment — config snippets that copy label fields into temporaries and map
//! those temporaries onto backend labels.
//!
//! Both Fluentd fragments consume the same [`LabelKeySet`]: the `<label>`
//! block is only meaningful after the `record_modifier` filter has populated
//! the temporaries for exactly those keys.

use super::keys::{LabelKeySet, LABEL_KUBERNETES_HOST, LABEL_TAG};
use crate::helpers::{escape_dollar_signs, quote, toml_key};

/// Environment variable carrying the node name in the Fluentd pod.
pub const FLUENTD_NODE_NAME_ENV: &str = "NODE_NAME";
/// Environment variable carrying the node name in the Vector pod.
pub const VECTOR_NODE_NAME_ENV: &str = "VECTOR_SELF_NODE_NAME";
/// Event field Vector sources stamp with their source type; the closest
/// Vector has to a transport tag.
pub const VECTOR_TAG_FIELD: &str = "source_type";

const FRAGMENT_INDENT: &str = "      ";

/// Label name for a dotted key: dots become underscores.
pub fn temp_name(key: &str) -> String {
    key.replace('.', "_")
}

/// Ruby `record.dig(...)` expression for a sequence of path segments.
fn record_dig<S: AsRef<str>>(segments: &[S]) -> String {
    let args: Vec<String> = segments.iter().map(|s| ruby_quote(s.as_ref())).collect();
    format!("${{record.dig({})}}", args.join(","))
}

// Double-quoted Ruby strings interpolate `#{expr}`, `#@ivar` and `#$gvar`.
fn ruby_quote(value: &str) -> String {
    let quoted = quote(value);
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' && matches!(chars.peek(), Some('{' | '@' | '$')) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `record_modifier` lines copying each label field into `_<temp name>`.
///
/// - `tag` copies the Fluentd tag
/// - `kubernetes.host` reads the node name from the collector's environment
/// - every other key digs the dotted path out of the record
pub fn render_filter_fragment(keys: &LabelKeySet) -> String {
    keys.iter()
        .map(|key| {
            let temp = temp_name(key);
            let source = match key {
                LABEL_TAG => "${tag}".to_string(),
                LABEL_KUBERNETES_HOST => format!("\"#{{ENV['{}']}}\"", FLUENTD_NODE_NAME_ENV),
                _ => {
                    let segments: Vec<&str> = key.split('.').collect();
                    record_dig(&segments)
                }
            };
            format!("{}_{} {}\n", FRAGMENT_INDENT, temp, source)
        })
        .collect()
}

/// Loki `<label>` lines mapping each label onto the temporary the filter
/// fragment populated.
pub fn render_label_fragment(keys: &LabelKeySet) -> String {
    keys.iter()
        .map(|key| {
            let temp = temp_name(key);
            format!("{}{} _{}\n", FRAGMENT_INDENT, temp, temp)
        })
        .collect()
}

/// Body of a Vector `[sinks.<id>.labels]` table.
///
/// Vector resolves `{{ path }}` against the event, so no temporaries are
/// needed. The host label comes from the collector's environment and the
/// tag label from the event's source type.
pub fn render_vector_labels(keys: &LabelKeySet) -> String {
    keys.iter()
        .map(|key| {
            let label = toml_key(&escape_dollar_signs(&temp_name(key)));
            let value = match key {
                LABEL_KUBERNETES_HOST => format!("\"${{{}}}\"", VECTOR_NODE_NAME_ENV),
                LABEL_TAG => quote(&format!("{{{{ {} }}}}", VECTOR_TAG_FIELD)),
                _ => quote(&format!("{{{{ {} }}}}", escape_dollar_signs(key))),
            };
            format!("{} = {}\n", label, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::resolve_label_keys;
    use crate::spec::Loki;

    fn keys_for(overrides: &[&str]) -> LabelKeySet {
        resolve_label_keys(Some(&Loki {
            label_keys: Some(overrides.iter().map(|s| s.to_string()).collect()),
            tenant_key: None,
        }))
    }

    #[test]
    fn test_temp_name() {
        assert_eq!(temp_name("kubernetes.namespace_name"), "kubernetes_namespace_name");
        assert_eq!(temp_name("tag"), "tag");
    }

    #[test]
    fn test_filter_fragment_default_keys() {
        let fragment = render_filter_fragment(&resolve_label_keys(None));
        let expected = concat!(
            "      _kubernetes_container_name ${record.dig(\"kubernetes\",\"container_name\")}\n",
            "      _kubernetes_host \"#{ENV['NODE_NAME']}\"\n",
            "      _kubernetes_namespace_name ${record.dig(\"kubernetes\",\"namespace_name\")}\n",
            "      _kubernetes_pod_name ${record.dig(\"kubernetes\",\"pod_name\")}\n",
            "      _log_type ${record.dig(\"log_type\")}\n",
            "      _tag ${tag}\n",
        );
        assert_eq!(fragment, expected);
    }

    #[test]
    fn test_label_fragment_default_keys() {
        let fragment = render_label_fragment(&resolve_label_keys(None));
        let expected = concat!(
            "      kubernetes_container_name _kubernetes_container_name\n",
            "      kubernetes_host _kubernetes_host\n",
            "      kubernetes_namespace_name _kubernetes_namespace_name\n",
            "      kubernetes_pod_name _kubernetes_pod_name\n",
            "      log_type _log_type\n",
            "      tag _tag\n",
        );
        assert_eq!(fragment, expected);
    }

    #[test]
    fn test_fragments_cover_same_temporaries() {
        let keys = keys_for(&["kubernetes.labels.app", "a.b.c"]);
        let filter = render_filter_fragment(&keys);
        let label = render_label_fragment(&keys);
        let populated: Vec<&str> = filter
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        let consumed: Vec<&str> = label
            .lines()
            .filter_map(|l| l.split_whitespace().nth(1))
            .collect();
        assert_eq!(populated, consumed);
        assert_eq!(populated.len(), keys.len());
    }

    #[test]
    fn test_filter_fragment_neutralizes_ruby_interpolation() {
        let keys = keys_for(&["evil.#{`id`}"]);
        let fragment = render_filter_fragment(&keys);
        assert!(fragment.contains(r#"${record.dig("evil","\#{`id`}")}"#), "{}", fragment);
    }

    #[test]
    fn test_filter_fragment_neutralizes_ivar_and_gvar_interpolation() {
        let keys = keys_for(&["app.#$0", "app.#@secret"]);
        let fragment = render_filter_fragment(&keys);
        assert!(fragment.contains(r#"${record.dig("app","\#$0")}"#), "{}", fragment);
        assert!(fragment.contains(r#"${record.dig("app","\#@secret")}"#), "{}", fragment);
        // A lone `#` is not an interpolation and stays as-is.
        let plain = render_filter_fragment(&keys_for(&["app.#id"]));
        assert!(plain.contains(r##"${record.dig("app","#id")}"##), "{}", plain);
    }

    #[test]
    fn test_vector_labels_default_keys() {
        let labels = render_vector_labels(&resolve_label_keys(None));
        let expected = concat!(
            "kubernetes_container_name = \"{{ kubernetes.container_name }}\"\n",
            "kubernetes_host = \"${VECTOR_SELF_NODE_NAME}\"\n",
            "kubernetes_namespace_name = \"{{ kubernetes.namespace_name }}\"\n",
            "kubernetes_pod_name = \"{{ kubernetes.pod_name }}\"\n",
            "log_type = \"{{ log_type }}\"\n",
            "tag = \"{{ source_type }}\"\n",
        );
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_vector_labels_quote_unusual_keys() {
        let labels = render_vector_labels(&keys_for(&["kubernetes.labels.app/name", "cost$center"]));
        assert!(labels.contains("\"kubernetes_labels_app/name\" = \"{{ kubernetes.labels.app/name }}\"\n"));
        assert!(labels.contains("\"cost$$center\" = \"{{ cost$$center }}\"\n"));
        let table: toml::Table = toml::from_str(&labels).expect("labels should be valid TOML");
        assert_eq!(table.len(), 4);
    }
}
