//! Table of contents extraction

use serde::Serialize;

use super::markdown::{heading_id, is_fence, parse_heading};

/// One entry of a table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Indent relative to the shallowest heading in the document (0-based)
    pub level: usize,
    pub text: String,
    pub id: String,
}

/// Collect the headings of a markdown document
///
/// Headings inside fenced code blocks are ignored, as is the level-1 heading
/// that duplicates `title` (it is not rendered, so it has no anchor).
pub fn generate_toc(markdown: &str, title: &str) -> Vec<TocEntry> {
    let mut headings = Vec::new();
    let mut in_code = false;
    let mut skipped_title = false;

    for line in markdown.lines() {
        if is_fence(line) {
            in_code = !in_code;
            continue;
        }
        if in_code {
            continue;
        }
        if let Some(heading) = parse_heading(line) {
            if heading.level == 1 && heading.text == title && !skipped_title {
                skipped_title = true;
                continue;
            }
            headings.push(heading);
        }
    }

    let min_level = headings.iter().map(|h| h.level).min().unwrap_or(1);

    headings
        .into_iter()
        .map(|h| TocEntry {
            level: h.level - min_level,
            text: h.text.to_string(),
            id: heading_id(h.text),
        })
        .collect()
}
