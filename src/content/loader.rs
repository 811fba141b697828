//! Content loader - loads posts and pages from their directories

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::{generate_toc, FrontMatter, MarkdownRenderer, Page, Post};
use crate::error::{BlogError, Result};
use crate::helpers::{full_url_for, strip_markdown_markers};
use crate::Blog;

lazy_static! {
    static ref DATE_PREFIX_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-").unwrap();
}

/// A markdown file read from disk
#[derive(Debug)]
struct Source {
    path: PathBuf,
    text: String,
    modified: Option<SystemTime>,
}

/// Loads content from the posts and pages directories
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
    pages_dir: PathBuf,
    base_url: String,
    default_author: String,
    preview_drafts: bool,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(blog: &Blog) -> Self {
        Self {
            posts_dir: blog.posts_dir.clone(),
            pages_dir: blog.pages_dir.clone(),
            base_url: blog.config.url.clone(),
            default_author: blog.config.author.clone(),
            preview_drafts: blog.config.preview_drafts,
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Load posts and pages, rejecting slugs that appear more than once
    pub async fn load_all(&self) -> Result<(Vec<Post>, Vec<Page>)> {
        let (posts, pages) = tokio::try_join!(self.load_posts(), self.load_pages())?;
        check_unique_slugs(&posts, &pages)?;
        Ok((posts, pages))
    }

    /// Load all posts, newest first
    pub async fn load_posts(&self) -> Result<Vec<Post>> {
        let sources = read_sources(&self.posts_dir).await?;

        let mut posts = Vec::with_capacity(sources.len());
        for source in sources {
            if let Some(post) = self.build_post(source)? {
                posts.push(post);
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        Ok(posts)
    }

    /// Load all pages, ordered by slug
    pub async fn load_pages(&self) -> Result<Vec<Page>> {
        let sources = read_sources(&self.pages_dir).await?;

        let mut pages = Vec::with_capacity(sources.len());
        for source in sources {
            if let Some(page) = self.build_page(source)? {
                pages.push(page);
            }
        }

        pages.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(pages)
    }

    /// Build a post; drafts yield `None` unless preview mode is on
    fn build_post(&self, source: Source) -> Result<Option<Post>> {
        let (fm, body) =
            FrontMatter::parse(&source.text).map_err(|e| BlogError::FrontMatter {
                path: source.path.clone(),
                source: e,
            })?;

        if fm.draft && !self.preview_drafts {
            tracing::debug!("Skipping draft {:?}", source.path);
            return Ok(None);
        }

        let slug = post_slug(&source.path);
        let title = fm.title.clone().unwrap_or_else(|| file_stem(&source.path));

        // Fall back to the file's modification time when no date is given
        let date = fm
            .parse_date()
            .or_else(|| source.modified.map(DateTime::<Utc>::from))
            .unwrap_or_else(Utc::now);

        Ok(Some(Post {
            slug: slug.clone(),
            date,
            author: fm.author.unwrap_or_else(|| self.default_author.clone()),
            tags: fm.tags,
            draft: fm.draft,
            description: extract_description(body),
            url: full_url_for(&self.base_url, &slug),
            html: self.renderer.render(body, &title),
            toc: fm.toc.then(|| generate_toc(body, &title)),
            title,
            source: source.path,
        }))
    }

    /// Build a page; drafts yield `None` unless preview mode is on
    fn build_page(&self, source: Source) -> Result<Option<Page>> {
        let (fm, body) =
            FrontMatter::parse(&source.text).map_err(|e| BlogError::FrontMatter {
                path: source.path.clone(),
                source: e,
            })?;

        if fm.draft && !self.preview_drafts {
            tracing::debug!("Skipping draft {:?}", source.path);
            return Ok(None);
        }

        let slug = file_stem(&source.path);
        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        Ok(Some(Page {
            slug: slug.clone(),
            author: fm.author.unwrap_or_else(|| self.default_author.clone()),
            draft: fm.draft,
            hidden: fm.hidden,
            description: extract_description(body),
            url: full_url_for(&self.base_url, &slug),
            html: self.renderer.render(body, &title),
            toc: fm.toc.then(|| generate_toc(body, &title)),
            title,
            source: source.path,
        }))
    }
}

/// List the markdown files directly inside `dir`. A missing directory has
/// no content.
pub(crate) fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        tracing::debug!("Content directory {:?} does not exist", dir);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| BlogError::io(dir, e.into()))?;
        let path = entry.path();
        if entry.file_type().is_file() && is_markdown_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read every markdown file in `dir` concurrently
async fn read_sources(dir: &Path) -> Result<Vec<Source>> {
    let dir = dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || markdown_files(&dir))
        .await
        .map_err(|e| BlogError::Task(e.to_string()))??;

    let mut tasks = JoinSet::new();
    for path in files {
        tasks.spawn(async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BlogError::io(&path, e))?;
            let modified = tokio::fs::metadata(&path)
                .await
                .and_then(|m| m.modified())
                .ok();
            Ok::<_, BlogError>(Source {
                path,
                text,
                modified,
            })
        });
    }

    let mut sources = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let source = joined.map_err(|e| BlogError::Task(e.to_string()))??;
        sources.push(source);
    }

    // Completion order is arbitrary
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// Fail when two documents share a slug
fn check_unique_slugs(posts: &[Post], pages: &[Page]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    let documents = posts
        .iter()
        .map(|p| (p.slug.as_str(), p.source.as_path()))
        .chain(pages.iter().map(|p| (p.slug.as_str(), p.source.as_path())));

    for (slug, source) in documents {
        if let Some(first) = seen.insert(slug, source) {
            return Err(BlogError::DuplicateSlug {
                slug: slug.to_string(),
                first: first.to_path_buf(),
                second: source.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Slug of a post: the file name without `.md` and without a leading
/// `YYYY-MM-DD-` date
pub fn post_slug(path: &Path) -> String {
    DATE_PREFIX_RE.replace(&file_stem(path), "").into_owned()
}

/// First non-empty paragraph of the markdown body, without `#`, `*` or
/// backticks
pub fn extract_description(markdown: &str) -> String {
    markdown
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(|paragraph| strip_markdown_markers(paragraph).trim().to_string())
        .find(|paragraph| !paragraph.is_empty())
        .unwrap_or_default()
}
