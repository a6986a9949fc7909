//! Description formatter
//!
//! Turns the catalog's inline markup into an HTML fragment in a single pass:
//!
//! - a newline becomes `<br>`
//! - `**text**` becomes `<b>text</b>` (first closing pair wins)
//! - `` `token` `` becomes an `<img>` when the token names an image file,
//!   otherwise a link opening in a new tab
//!
//! Text outside these tokens is escaped. A bold span may not contain a
//! newline or a backtick, and a backtick token may not contain a newline;
//! markers that do not close are kept as literal text. Output is never
//! re-scanned.

use super::escape::safe_url;

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Format a free-text description; absent or empty input yields `""`
pub fn format_description(raw: Option<&str>) -> String {
    let Some(text) = raw.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut rest = text;

    while !rest.is_empty() {
        // Plain run up to the next character that can start a token
        let plain_len = rest.find(['\n', '\r', '*', '`']).unwrap_or(rest.len());
        if plain_len > 0 {
            push_escaped(&mut out, &rest[..plain_len]);
            rest = &rest[plain_len..];
            continue;
        }

        if let Some(after) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
            out.push_str("<br>");
            rest = after;
        } else if let Some((inner, after)) = rest.strip_prefix("**").and_then(split_bold) {
            out.push_str("<b>");
            push_escaped(&mut out, inner);
            out.push_str("</b>");
            rest = after;
        } else if let Some((html, after)) = rest.strip_prefix('`').and_then(split_token) {
            out.push_str(&html);
            rest = after;
        } else {
            // Unmatched marker: emit one literal character and move on
            let len = rest.chars().next().map_or(1, char::len_utf8);
            push_escaped(&mut out, &rest[..len]);
            rest = &rest[len..];
        }
    }

    out
}

/// Split `text**rest` into `(text, rest)`
fn split_bold(after_open: &str) -> Option<(&str, &str)> {
    let end = after_open.find("**")?;
    let inner = &after_open[..end];
    if inner.is_empty() || inner.contains(['\n', '\r', '`']) {
        return None;
    }
    Some((inner, &after_open[end + 2..]))
}

/// Split `token`rest` into the rendered element and `rest`
fn split_token(after_open: &str) -> Option<(String, &str)> {
    let end = after_open.find(['`', '\n'])?;
    if !after_open[end..].starts_with('`') {
        return None;
    }
    let html = render_token(after_open[..end].trim())?;
    Some((html, &after_open[end + 1..]))
}

fn render_token(token: &str) -> Option<String> {
    let target = safe_url(token)?;

    let mut html = String::new();
    if is_image(target) {
        html.push_str("<img src=\"");
        push_escaped(&mut html, target);
        html.push_str("\" alt=\"\" loading=\"lazy\">");
    } else {
        html.push_str("<a href=\"");
        push_escaped(&mut html, target);
        html.push_str(
            "\" target=\"_blank\" rel=\"noopener noreferrer\">Link <i class=\"fas fa-external-link-alt\"></i></a>",
        );
    }
    Some(html)
}

/// Append `input` to `out` with HTML special characters escaped
fn push_escaped(out: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn is_image(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(format_description(None), "");
        assert_eq!(format_description(Some("")), "");
    }

    #[test]
    fn test_bold_then_line_break() {
        let html = format_description(Some("**Bold** text\nLine2"));
        assert_eq!(html, "<b>Bold</b> text<br>Line2");
        assert_eq!(html.matches("<b>Bold</b>").count(), 1);
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_image_token() {
        assert_eq!(
            format_description(Some("`https://x/y.png`")),
            r#"<img src="https://x/y.png" alt="" loading="lazy">"#
        );
        assert!(format_description(Some("`https://x/Y.JPEG`")).starts_with("<img "));
    }

    #[test]
    fn test_link_token() {
        let html = format_description(Some("`https://x/y`"));
        assert!(html.starts_with(r#"<a href="https://x/y" target="_blank""#));
        assert!(html.ends_with("</a>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        assert_eq!(
            format_description(Some("<script>alert(1)</script> & more")),
            "&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"
        );
    }

    #[test]
    fn test_attribute_injection_in_token() {
        let html = format_description(Some(r#"`https://x/" onerror="alert(1).png`"#));
        assert!(html.starts_with("<img src=\"https://x/&quot; onerror=&quot;alert(1).png\""));
    }

    #[test]
    fn test_executable_scheme_stays_text() {
        let html = format_description(Some("`javascript:alert(1)`"));
        assert_eq!(html, "`javascript:alert(1)`");
    }

    #[test]
    fn test_unclosed_markers_are_literal() {
        assert_eq!(format_description(Some("a ** b")), "a ** b");
        assert_eq!(format_description(Some("price `5")), "price `5");
        assert_eq!(format_description(Some("a*b")), "a*b");
    }

    #[test]
    fn test_bold_does_not_span_tokens_or_lines() {
        assert_eq!(
            format_description(Some("**a `https://x/y.png` b**")),
            r#"**a <img src="https://x/y.png" alt="" loading="lazy"> b**"#
        );
        assert_eq!(format_description(Some("**a\nb**")), "**a<br>b**");
    }

    #[test]
    fn test_token_does_not_span_lines() {
        assert_eq!(format_description(Some("`a\nb`")), "`a<br>b`");
    }

    #[test]
    fn test_non_greedy_bold() {
        assert_eq!(
            format_description(Some("**one** and **two**")),
            "<b>one</b> and <b>two</b>"
        );
        assert_eq!(format_description(Some("***x**")), "<b>*x</b>");
    }

    #[test]
    fn test_crlf_and_unicode() {
        assert_eq!(
            format_description(Some("héllo\r\n**wörld**")),
            "héllo<br><b>wörld</b>"
        );
    }
}
