//! Lexical helpers shared by assignment and schema-property lines.

use envx_core::EnvxError;

/// Opening and closing marker of a multiline value.
pub(crate) const TRIPLE_QUOTE: &str = "\"\"\"";

/// Splits a line on its first `=`.
pub(crate) fn split_key_value(line: &str, line_no: usize) -> Result<(&str, &str), EnvxError> {
    line.split_once('=')
        .ok_or_else(|| EnvxError::syntax(line_no, "missing \"=\" delimiter in assignment"))
}

/// Removes one matching pair of surrounding `"` or `'`.
pub(crate) fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
