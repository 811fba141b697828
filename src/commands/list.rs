//! List site content

use anyhow::Result;

use crate::content::{ContentLoader, Page, Post};
use crate::helpers::format_ymd;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(blog);

    let listing = match content_type {
        "post" | "posts" => list_posts(&loader.load_posts().await?),
        "page" | "pages" => list_pages(&loader.load_pages().await?),
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    };

    print!("{}", listing);
    Ok(())
}

fn list_posts(posts: &[Post]) -> String {
    let lines: String = posts
        .iter()
        .map(|post| {
            format!(
                "  {} - {} [{}]{}\n",
                format_ymd(&post.date),
                post.title,
                post.slug,
                if post.draft { " (draft)" } else { "" }
            )
        })
        .collect();
    format!("Posts ({}):\n{}", posts.len(), lines)
}

fn list_pages(pages: &[Page]) -> String {
    let lines: String = pages
        .iter()
        .map(|page| {
            let flags: Vec<&str> = [(page.draft, "draft"), (page.hidden, "hidden")]
                .into_iter()
                .filter_map(|(set, name)| set.then_some(name))
                .collect();
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            };
            format!("  {} [{}]{}\n", page.title, page.slug, flags)
        })
        .collect();
    format!("Pages ({}):\n{}", pages.len(), lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    fn blog(preview_drafts: bool) -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        let pages = dir.path().join("pages");
        fs::create_dir_all(&posts).unwrap();
        fs::create_dir_all(&pages).unwrap();
        fs::write(
            posts.join("2024-03-01-hello.md"),
            "---\ntitle: Hello\ndate: 2024-03-01\n---\nHi\n",
        )
        .unwrap();
        fs::write(
            posts.join("2024-03-02-wip.md"),
            "---\ntitle: WIP\ndate: 2024-03-02\ndraft: true\n---\nSoon\n",
        )
        .unwrap();
        fs::write(pages.join("now.md"), "---\ntitle: Now\nhidden: true\n---\nBusy\n").unwrap();

        let mut config = SiteConfig::default();
        config.preview_drafts = preview_drafts;
        let blog = Blog::with_config(dir.path(), config);
        (dir, blog)
    }

    #[tokio::test]
    async fn test_list_posts_with_drafts() {
        let (_dir, blog) = blog(true);
        let posts = ContentLoader::new(&blog).load_posts().await.unwrap();
        assert_eq!(
            list_posts(&posts),
            "Posts (2):\n  2024-03-02 - WIP [wip] (draft)\n  2024-03-01 - Hello [hello]\n"
        );
    }

    #[tokio::test]
    async fn test_list_pages_flags() {
        let (_dir, blog) = blog(false);
        let pages = ContentLoader::new(&blog).load_pages().await.unwrap();
        assert_eq!(list_pages(&pages), "Pages (1):\n  Now [now] (hidden)\n");
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let (_dir, blog) = blog(false);
        assert!(run(&blog, "tags").await.is_err());
    }
}
