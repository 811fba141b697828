//! Content cache
//!
//! Rendered posts and pages are kept in an immutable [`ContentSnapshot`].
//! At most once per check interval a request re-fingerprints the content
//! directories (file names plus modification times) and reloads everything
//! when the fingerprint moved. A fingerprint that cannot be computed counts
//! as a change, so errors lean towards reloading.
//!
//! The check-then-reload sequence runs under a single async mutex. The new
//! snapshot is published with one pointer swap after all files have been
//! read, so a reader sees either the old or the new content, never a mix.

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;
use walkdir::WalkDir;

use crate::content::{ContentLoader, Document, Page, Post};
use crate::error::{BlogError, Result};

/// Minimum time between two directory scans
pub const CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Everything loaded from disk in one reload
#[derive(Debug, Default)]
pub struct ContentSnapshot {
    /// Posts, newest first
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    /// Content hash per slug, served as the ETag. Every rendered document
    /// carries the navigation bar, so the hash covers it too.
    pub etags: HashMap<String, String>,
}

impl ContentSnapshot {
    pub fn new(posts: Vec<Post>, pages: Vec<Page>) -> Self {
        let nav = navigation_hash(&pages);
        let etags = posts
            .iter()
            .map(|p| (p.slug.clone(), etag_for(p, nav)))
            .chain(pages.iter().map(|p| (p.slug.clone(), etag_for(p, nav))))
            .collect();
        Self {
            posts,
            pages,
            etags,
        }
    }

    /// Find a post or page by slug. Posts take precedence, although loading
    /// already rejects duplicate slugs.
    pub fn find(&self, slug: &str) -> Option<Document<'_>> {
        self.posts
            .iter()
            .find(|p| p.slug == slug)
            .map(Document::Post)
            .or_else(|| {
                self.pages
                    .iter()
                    .find(|p| p.slug == slug)
                    .map(Document::Page)
            })
    }

    pub fn etag(&self, slug: &str) -> Option<&str> {
        self.etags.get(slug).map(String::as_str)
    }
}

fn etag_for<T: Serialize>(document: &T, nav: u64) -> String {
    let serialized = serde_json::to_string(document).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    serialized.hash(&mut hasher);
    nav.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Hash of the page links shown in the header
fn navigation_hash(pages: &[Page]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for page in pages.iter().filter(|page| !page.hidden) {
        page.slug.hash(&mut hasher);
    }
    hasher.finish()
}

/// Whether the snapshot must be (re)loaded. `fresh` is `None` when the
/// directories could not be fingerprinted, which always forces a reload.
fn needs_reload(has_snapshot: bool, stored: Option<u64>, fresh: Option<u64>) -> bool {
    match (has_snapshot, fresh) {
        (false, _) | (true, None) => true,
        (true, Some(fresh)) => stored != Some(fresh),
    }
}

#[derive(Debug, Default)]
struct Freshness {
    last_check: Option<Instant>,
    /// Fingerprint of the directories the current snapshot was loaded from
    fingerprint: Option<u64>,
}

/// Process-wide content cache handed to request handlers
#[derive(Debug)]
pub struct ContentCache {
    loader: ContentLoader,
    interval: Duration,
    freshness: Mutex<Freshness>,
    current: RwLock<Option<Arc<ContentSnapshot>>>,
}

impl ContentCache {
    /// Create a cache that re-checks the directories every [`CHECK_INTERVAL`]
    pub fn new(loader: ContentLoader) -> Self {
        Self::with_interval(loader, CHECK_INTERVAL)
    }

    pub fn with_interval(loader: ContentLoader, interval: Duration) -> Self {
        Self {
            loader,
            interval,
            freshness: Mutex::new(Freshness::default()),
            current: RwLock::new(None),
        }
    }

    /// The last published snapshot, without checking for changes
    pub fn current(&self) -> Option<Arc<ContentSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return fresh content, reloading from disk when it changed
    pub async fn get(&self) -> Result<Arc<ContentSnapshot>> {
        // Single writer: only the holder of this lock may check or reload
        let mut freshness = self.freshness.lock().await;
        let current = self.current();

        let now = Instant::now();
        let due = freshness
            .last_check
            .map_or(true, |last| now.duration_since(last) >= self.interval);

        if let (Some(snapshot), false) = (&current, due) {
            return Ok(snapshot.clone());
        }
        freshness.last_check = Some(now);

        let fingerprint = match self.fingerprint().await {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                tracing::warn!("Failed to fingerprint content directories: {}", e);
                None
            }
        };

        if let Some(snapshot) = &current {
            if !needs_reload(true, freshness.fingerprint, fingerprint) {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = Arc::new(self.reload().await?);
        // Only remember the fingerprint once the reload succeeded, so a
        // failed reload is retried on the next check
        freshness.fingerprint = fingerprint;
        self.publish(snapshot.clone());

        Ok(snapshot)
    }

    async fn reload(&self) -> Result<ContentSnapshot> {
        let started = Instant::now();
        let (posts, pages) = self.loader.load_all().await?;
        tracing::info!(
            "Loaded {} posts and {} pages in {:?}",
            posts.len(),
            pages.len(),
            started.elapsed()
        );
        Ok(ContentSnapshot::new(posts, pages))
    }

    fn publish(&self, snapshot: Arc<ContentSnapshot>) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(snapshot);
    }

    async fn fingerprint(&self) -> Result<u64> {
        let dirs = vec![
            self.loader.posts_dir().to_path_buf(),
            self.loader.pages_dir().to_path_buf(),
        ];
        tokio::task::spawn_blocking(move || {
            let dirs: Vec<&Path> = dirs.iter().map(PathBuf::as_path).collect();
            fingerprint_dirs(&dirs).map_err(|e| BlogError::io(dirs[0], e))
        })
        .await
        .map_err(|e| BlogError::Task(e.to_string()))?
    }
}

/// Calculate a hash for content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Fingerprint the listings of several directories
///
/// Every entry contributes its file name and modification time in
/// milliseconds, in file name order. A missing directory contributes a
/// marker of its own so that creating it counts as a change.
pub fn fingerprint_dirs(dirs: &[&Path]) -> io::Result<u64> {
    let mut hasher = DefaultHasher::new();

    for dir in dirs {
        dir.hash(&mut hasher);
        if !dir.exists() {
            "<missing>".hash(&mut hasher);
            continue;
        }

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let mtime = entry
                .metadata()?
                .modified()?
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis();
            entry.file_name().hash(&mut hasher);
            mtime.hash(&mut hasher);
        }
    }

    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::Blog;
    use std::fs;

    fn write_post(base: &Path, name: &str, title: &str) {
        let dir = base.join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(name),
            format!("---\ntitle: {}\ndate: 2024-01-01\n---\nBody of {}", title, title),
        )
        .unwrap();
    }

    fn cache(base: &Path, interval: Duration) -> ContentCache {
        let blog = Blog::with_config(base, SiteConfig::default());
        ContentCache::with_interval(ContentLoader::new(&blog), interval)
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }

    #[test]
    fn test_fingerprint_tracks_listing() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");

        let missing = fingerprint_dirs(&[&posts]).unwrap();
        write_post(dir.path(), "a.md", "A");
        let one = fingerprint_dirs(&[&posts]).unwrap();
        assert_ne!(missing, one);
        assert_eq!(one, fingerprint_dirs(&[&posts]).unwrap());

        write_post(dir.path(), "b.md", "B");
        assert_ne!(one, fingerprint_dirs(&[&posts]).unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_reused_within_interval() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.md", "A");
        let cache = cache(dir.path(), Duration::from_secs(3600));

        let first = cache.get().await.unwrap();
        assert_eq!(first.posts.len(), 1);

        write_post(dir.path(), "b.md", "B");
        let second = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_reload_on_directory_change() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.md", "A");
        let cache = cache(dir.path(), Duration::ZERO);

        let first = cache.get().await.unwrap();
        let unchanged = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &unchanged));

        write_post(dir.path(), "b.md", "B");
        let reloaded = cache.get().await.unwrap();
        assert_eq!(reloaded.posts.len(), 2);
        assert!(Arc::ptr_eq(&reloaded, &cache.current().unwrap()));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.md", "A");
        let cache = cache(dir.path(), Duration::ZERO);
        let good = cache.get().await.unwrap();

        fs::write(dir.path().join("posts/bad.md"), "---\ntitle: [x\nk: v\n---\n").unwrap();
        assert!(cache.get().await.is_err());
        assert!(Arc::ptr_eq(&good, &cache.current().unwrap()));

        // the broken file is retried, and recovers once fixed
        fs::remove_file(dir.path().join("posts/bad.md")).unwrap();
        write_post(dir.path(), "c.md", "C");
        assert_eq!(cache.get().await.unwrap().posts.len(), 2);
    }

    fn post(slug: &str) -> Post {
        Post {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            date: chrono::Utc::now(),
            author: String::new(),
            tags: Vec::new(),
            draft: false,
            description: String::new(),
            url: String::new(),
            html: format!("<p>{}</p>", slug),
            toc: None,
            source: PathBuf::from(format!("{}.md", slug)),
        }
    }

    fn page(slug: &str, hidden: bool) -> Page {
        Page {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            author: String::new(),
            draft: false,
            hidden,
            description: String::new(),
            url: String::new(),
            html: format!("<p>{}</p>", slug),
            toc: None,
            source: PathBuf::from(format!("{}.md", slug)),
        }
    }

    #[test]
    fn test_snapshot_lookup_and_etags() {
        let snapshot = ContentSnapshot::new(vec![post("a"), post("b")], Vec::new());

        assert!(matches!(snapshot.find("a"), Some(Document::Post(p)) if p.slug == "a"));
        assert!(snapshot.find("c").is_none());
        assert_eq!(snapshot.etag("a").map(str::len), Some(16));
        assert_ne!(snapshot.etag("a"), snapshot.etag("b"));
    }

    #[test]
    fn test_etag_follows_navigation() {
        let hello = post("hello");
        let before = ContentSnapshot::new(vec![hello.clone()], Vec::new());
        let with_about = ContentSnapshot::new(vec![hello.clone()], vec![page("about", false)]);
        let with_hidden = ContentSnapshot::new(vec![hello], vec![page("now", true)]);

        assert_ne!(before.etag("hello"), with_about.etag("hello"));
        // hidden pages are not linked, so the rendered post is unchanged
        assert_eq!(before.etag("hello"), with_hidden.etag("hello"));
    }

    #[tokio::test]
    async fn test_new_page_changes_post_etag() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "hello.md", "Hello");
        let cache = cache(dir.path(), Duration::ZERO);
        let before = cache.get().await.unwrap().etag("hello").map(str::to_string);

        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/about.md"), "---\ntitle: About\n---\nMe\n").unwrap();
        let after = cache.get().await.unwrap().etag("hello").map(str::to_string);

        assert!(before.is_some());
        assert_ne!(before, after);
    }

    #[test]
    fn test_needs_reload() {
        // first load
        assert!(needs_reload(false, None, Some(1)));
        assert!(needs_reload(false, Some(1), Some(1)));
        // unchanged and changed directories
        assert!(!needs_reload(true, Some(1), Some(1)));
        assert!(needs_reload(true, Some(1), Some(2)));
        // a fingerprint that could not be computed always reloads
        assert!(needs_reload(true, Some(1), None));
        assert!(needs_reload(true, None, None));
    }

    #[cfg(unix)]
    #[test]
    fn test_fingerprint_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        let drafts = dir.path().join("drafts");
        fs::create_dir_all(&posts).unwrap();
        fs::create_dir_all(&drafts).unwrap();
        let target = drafts.join("a.md");
        fs::write(&target, "one").unwrap();
        std::os::unix::fs::symlink(&target, posts.join("a.md")).unwrap();

        let before = fingerprint_dirs(&[&posts]).unwrap();
        let file = fs::File::options().write(true).open(&target).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
        assert_ne!(before, fingerprint_dirs(&[&posts]).unwrap());
    }
}
