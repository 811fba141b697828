//! Post and Page models

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::TocEntry;

/// A blog post
///
/// Built fresh on every content reload and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// URL-friendly name, from the file name without its date prefix
    pub slug: String,

    /// Publication date
    pub date: DateTime<Utc>,

    pub author: String,

    pub tags: Vec<String>,

    /// Only present in listings when draft preview is enabled
    pub draft: bool,

    /// First paragraph of the source, markup stripped
    pub description: String,

    /// Canonical URL
    pub url: String,

    /// Rendered HTML body
    pub html: String,

    /// Table of contents, when requested in the front-matter
    pub toc: Option<Vec<TocEntry>>,

    /// Source file
    pub source: PathBuf,
}

/// A standalone page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    pub author: String,
    pub draft: bool,
    /// Kept out of the navigation bar
    pub hidden: bool,
    pub description: String,
    pub url: String,
    pub html: String,
    pub toc: Option<Vec<TocEntry>>,
    pub source: PathBuf,
}

/// Either kind of document, as found by slug
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Post(&'a Post),
    Page(&'a Page),
}

impl Document<'_> {
    pub fn slug(&self) -> &str {
        match self {
            Document::Post(post) => &post.slug,
            Document::Page(page) => &page.slug,
        }
    }
}
