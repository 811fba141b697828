//! Markdown rendering with decorated headings
//!
//! Rendering happens in two passes. [`transform_headings`] rewrites the
//! markdown line by line: fenced code blocks become escaped `<pre>` blocks
//! and heading lines become HTML headings drawn with box characters. The
//! result, which is still markdown with embedded HTML blocks, is then handed
//! to pulldown-cmark.

use lazy_static::lazy_static;
use pulldown_cmark::{html, Event, Options, Parser};
use regex::Regex;

use crate::helpers::{double_box, escape_code, single_box};

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})(?:[ \t]+(.*))?$").unwrap();
}

/// A heading line: level 1 to 6 and its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    pub text: &'a str,
}

/// Parse a markdown heading line (`#` to `######` followed by whitespace)
pub fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let line = line.trim_end();
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some(Heading { level, text })
}

/// Whether the line opens or closes a fenced code block
pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

/// Compute the anchor id for a heading
///
/// Lowercases, drops everything except ASCII letters, digits, `_`, `-` and
/// spaces, turns runs of spaces and hyphens into one hyphen and trims
/// hyphens from both ends.
///
/// # Examples
/// ```ignore
/// heading_id("C++ & Rust!") // -> "c-rust"
/// ```
pub fn heading_id(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();

    let mut id = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c == ' ' || c == '-' {
            if !id.ends_with('-') {
                id.push('-');
            }
        } else {
            id.push(c);
        }
    }

    id.trim_matches('-').to_string()
}

/// Rewrite headings and fenced code blocks into HTML blocks
///
/// The first level-1 heading whose text equals `title` is dropped, since
/// the page already shows the title.
pub fn transform_headings(markdown: &str, title: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut skipped_title = false;
    let mut code: Option<(String, Vec<&str>)> = None;

    for line in markdown.lines() {
        if is_fence(line) {
            match code.take() {
                Some((lang, lines)) => result.push(code_block(&lang, &lines)),
                None => {
                    let lang = line.trim()[3..].trim().to_string();
                    code = Some((lang, Vec::new()));
                }
            }
            continue;
        }

        if let Some((_, lines)) = code.as_mut() {
            lines.push(line);
            continue;
        }

        let Some(heading) = parse_heading(line) else {
            result.push(line.to_string());
            continue;
        };

        if heading.level == 1 && heading.text == title && !skipped_title {
            skipped_title = true;
            continue;
        }

        result.push(heading_html(heading));
        // Terminate the HTML block so the following line is parsed as markdown
        result.push(String::new());
    }

    // An unterminated fence runs to the end of the document
    if let Some((lang, lines)) = code {
        result.push(code_block(&lang, &lines));
    }

    result.join("\n")
}

fn code_block(lang: &str, lines: &[&str]) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        escape_code(lang),
        escape_code(&lines.join("\n"))
    )
}

fn heading_html(heading: Heading<'_>) -> String {
    let id = heading_id(heading.text);
    let text = heading.text;
    match heading.level {
        1 => format!(
            "<h1 id=\"{id}\">\n<pre class=\"h1-box\">\n{}\n</pre>\n</h1>",
            double_box(text)
        ),
        2 => format!(
            "<h2 id=\"{id}\"><pre class=\"h2-box\">{}</pre></h2>",
            single_box(text)
        ),
        3 => format!("<h3 id=\"{id}\"><u>{}</u></h3>", escape_code(text)),
        level => format!("<h{level} id=\"{id}\">{}</h{level}>", escape_code(text)),
    }
}

/// Markdown renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    hard_breaks: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with GFM extensions and single newlines rendered
    /// as line breaks
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM,
            hard_breaks: true,
        }
    }

    /// Create with custom line-break handling
    #[cfg(test)]
    pub fn with_options(hard_breaks: bool) -> Self {
        Self {
            hard_breaks,
            ..Self::new()
        }
    }

    /// Decorate headings, then render the document to HTML
    pub fn render(&self, markdown: &str, title: &str) -> String {
        self.to_html(&transform_headings(markdown, title))
    }

    /// Render plain markdown to HTML
    pub fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let hard_breaks = self.hard_breaks;
        let events = parser.map(|event| match event {
            Event::SoftBreak if hard_breaks => Event::HardBreak,
            other => other,
        });

        let mut html_output = String::new();
        html::push_html(&mut html_output, events);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
