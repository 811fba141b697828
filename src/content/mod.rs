//! Content module - handles posts, pages, and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod toc;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::{heading_id, parse_heading, transform_headings, Heading, MarkdownRenderer};
pub use post::{Document, Page, Post};
pub use toc::{generate_toc, TocEntry};
