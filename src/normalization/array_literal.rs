use std::sync::LazyLock;

use regex::Regex;

/// One element of an array literal: either a run of plain characters or a
/// double-quoted span (which may contain commas and backslash escapes).
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[^,"]|"(?:\\.|[^"])*")+"#).expect("array literal element pattern is valid")
});

/// Render items in the textual form Postgres uses for `text[]` columns.
///
/// No escaping is performed; values are expected to be free of commas and braces.
/// Empty items do not survive a round-trip: [`decode`] skips them.
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let joined = items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{joined}}}")
}

/// Parse a `{a,b,"c,d"}` literal back into its items.
///
/// Anything not wrapped in braces decodes to an empty list. Quoted items keep
/// their inner text verbatim; malformed quoting is not validated.
pub fn decode(text: &str) -> Vec<String> {
    let Some(content) = text.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Vec::new();
    };
    if content.is_empty() {
        return Vec::new();
    }

    ELEMENT_RE
        .find_iter(content)
        .map(|m| {
            let item = m.as_str().trim();
            match item.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                Some(inner) => inner.to_string(),
                None => item.to_string(),
            }
        })
        .collect()
}
