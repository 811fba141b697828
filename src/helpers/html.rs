//! HTML helper functions

use crate::config::Favicon;

/// Escape text for use in element content or a quoted attribute value
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape only the characters that open markup or entities.
/// Used for code and `<pre>` content, where quotes stay as written.
pub fn escape_code(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Draw a double-line box around `text`
///
/// # Examples
/// ```ignore
/// double_box("Hi") // -> "╔══════╗\n║  Hi  ║\n╚══════╝"
/// ```
pub fn double_box(text: &str) -> String {
    let bar = "═".repeat(text.chars().count() + 4);
    format!("╔{bar}╗\n║  {}  ║\n╚{bar}╝", escape_code(text))
}

/// Draw a single-line box around `text`
///
/// # Examples
/// ```ignore
/// single_box("Hi") // -> "┌────┐\n│ Hi │\n└────┘"
/// ```
pub fn single_box(text: &str) -> String {
    let bar = "─".repeat(text.chars().count() + 2);
    format!("┌{bar}┐\n│ {} │\n└{bar}┘", escape_code(text))
}

/// Generate an anchor tag with escaped href and text
pub fn link_to(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        escape_html(href),
        escape_html(text)
    )
}

/// Generate the favicon link tag, if an icon is configured
pub fn favicon_tag(favicon: Option<&Favicon>) -> String {
    match favicon {
        Some(Favicon::Svg(href)) => format!(
            r#"<link rel="icon" type="image/svg+xml" href="{}">"#,
            escape_html(href)
        ),
        Some(Favicon::Path(href)) | Some(Favicon::Base64(href)) => {
            format!(r#"<link rel="icon" href="{}">"#, escape_html(href))
        }
        None => String::new(),
    }
}

/// Remove inline markdown markers (`#`, `*` and backticks)
pub fn strip_markdown_markers(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '#' | '*' | '`')).collect()
}
