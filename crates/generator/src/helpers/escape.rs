//! Escape — protect externally sourced values from config interpolation.

/// Double every `$` so Vector reads it as a literal instead of the start of
/// an environment-variable interpolation.
///
/// Apply exactly once, before the value is embedded. Escaping an already
/// escaped value doubles the markers again.
pub fn escape_dollar_signs(s: &str) -> String {
    s.replace('$', "$$")
}
