//! Ident — component identifiers and list formatting for generated config.

/// Turn a human-readable name into a config-section key.
///
/// Spaces, hyphens and dots become underscores and the result is lowercased.
/// The transformation is total and idempotent.
pub fn format_component_id(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Component id used for an output's sink section.
pub fn make_output_id(name: &str) -> String {
    format_component_id(&format!("output_{}", name))
}

/// Quote a value as a double-quoted basic string.
///
/// Backslashes, quotes and control characters are escaped so the literal is
/// valid in both TOML and Fluentd double-quoted values.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A TOML key: bare when it only uses `A-Za-z0-9_-`, quoted otherwise.
pub fn toml_key(name: &str) -> String {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Render values as a bracketed list of quoted literals: `["a","b"]`.
///
/// An element already wrapped in double quotes is treated as a pre-quoted
/// literal and emitted as-is.
pub fn make_inputs<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| {
            let v = v.as_ref();
            if is_pre_quoted(v) {
                v.to_string()
            } else {
                quote(v)
            }
        })
        .collect();
    format!("[{}]", items.join(","))
}

// A lone `"` counts too: it both starts and ends with a quote.
fn is_pre_quoted(value: &str) -> bool {
    value.starts_with('"') && value.ends_with('"')
}

/// Trim leading and trailing whitespace from every element.
pub fn trim_spaces<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().trim().to_string()).collect()
}
