//! Script and link safety for untrusted catalog content
//!
//! Templates escape markup themselves; these cover what plain HTML escaping
//! does not: executable link schemes and JSON embedded in `<script>`.

use serde_json::Value;

/// Link target with an executable scheme removed
///
/// Returns `None` for `javascript:`, `vbscript:` and `data:` targets, ignoring
/// case and embedded whitespace or control characters the way browsers do.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let scheme: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take_while(|c| *c != ':' && *c != '/' && *c != '?' && *c != '#')
        .collect::<String>()
        .to_ascii_lowercase();
    let has_scheme = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .nth(scheme.chars().count())
        == Some(':');

    if has_scheme && matches!(scheme.as_str(), "javascript" | "vbscript" | "data") {
        None
    } else {
        Some(url)
    }
}

/// Serialize JSON for embedding inside a `<script>` element
///
/// `<` is written as `\u003c`, so the payload can never close the element.
pub fn json_for_script(value: &Value) -> String {
    value.to_string().replace('<', "\\u003c")
}
