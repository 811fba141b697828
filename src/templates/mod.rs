//! HTML page renderer
//!
//! Every document shares one layout: the inline stylesheet, the header with
//! the site title and navigation, then the page body. Values coming from
//! content or configuration are escaped here; rendered markdown bodies are
//! inserted as they are.

mod pagination;
mod styles;

pub use pagination::{parse_page_param, Pagination};
pub use styles::stylesheet;

use crate::config::SiteConfig;
use crate::content::{Page, Post, TocEntry};
use crate::helpers::{
    double_box, escape_code, escape_html, favicon_tag, format_ymd, link_to, slug_path,
};

/// Renders complete HTML documents for the site
#[derive(Debug, Clone)]
pub struct PageRenderer {
    config: SiteConfig,
    styles: String,
}

/// Per-document `<head>` values
struct Head<'a> {
    title: String,
    description: &'a str,
    extra: String,
}

impl PageRenderer {
    pub fn new(config: SiteConfig) -> Self {
        let styles = stylesheet(&config.theme);
        Self { config, styles }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Render one page of the post listing
    pub fn render_index(&self, posts: &[Post], pages: &[Page], page: usize) -> String {
        let pagination = Pagination::new(page, self.config.per_page, posts.len());

        let mut body = String::new();
        if self.config.preview_drafts {
            body.push_str(r#"<div class="draft-notice">Draft Preview Mode Enabled</div>"#);
            body.push('\n');
        }
        for post in pagination.page_slice(posts) {
            body.push_str(&self.render_preview(post));
        }
        body.push_str(&pagination.render());

        let head = Head {
            title: escape_html(&self.config.title),
            description: &self.config.description,
            extra: format!(
                r#"<link rel="alternate" type="application/rss+xml" title="{}" href="/rss.xml">"#,
                escape_html(&self.config.rss.title)
            ),
        };
        self.layout(head, &body, pages)
    }

    fn render_preview(&self, post: &Post) -> String {
        format!(
            r#"<article class="post-preview">
<h2>{}</h2>
<div class="metadata">
<div class="meta-line">{}</div>
{}
</div>
</article>
"#,
            link_to(&slug_path(&post.slug), &post.title),
            self.meta_line(post),
            render_tags(&post.tags),
        )
    }

    /// Render a single post with its boxed title, metadata and optional TOC
    pub fn render_post(&self, post: &Post, pages: &[Page]) -> String {
        let toc = post.toc.as_deref().map(render_toc).unwrap_or_default();
        let body = format!(
            r#"<article>
<h1><pre class="h1-box">
{}</pre></h1>
<div class="metadata">
{}
{}
</div>
{}
{}
</article>
"#,
            double_box(&post.title),
            self.meta_line(post),
            render_tags(&post.tags),
            toc,
            post.html,
        );

        let mut extra = format!(
            r#"<meta property="og:title" content="{}">
<meta property="og:description" content="{}">"#,
            escape_html(&post.title),
            escape_html(&post.description),
        );
        if let Some(image) = self.config.og_image_url() {
            extra.push_str(&format!(
                "\n<meta property=\"og:image\" content=\"{}\">",
                escape_html(&image)
            ));
        }

        let head = Head {
            title: self.document_title(&post.title),
            description: &post.description,
            extra,
        };
        self.layout(head, &body, pages)
    }

    /// Render a standalone page
    pub fn render_page(&self, page: &Page, pages: &[Page]) -> String {
        let toc = page.toc.as_deref().map(render_toc).unwrap_or_default();
        let body = format!("<article>\n{}\n{}\n</article>\n", toc, page.html);

        let description = if page.description.is_empty() {
            &self.config.description
        } else {
            &page.description
        };
        let head = Head {
            title: self.document_title(&page.title),
            description,
            extra: String::new(),
        };
        self.layout(head, &body, pages)
    }

    pub fn render_not_found(&self, pages: &[Page]) -> String {
        let head = Head {
            title: self.document_title("404 - Not Found"),
            description: &self.config.description,
            extra: String::new(),
        };
        let body = "<h1>404 - Not Found</h1>\n<p>The page you're looking for doesn't exist.</p>\n";
        self.layout(head, body, pages)
    }

    /// Render the server error page; `error` is shown escaped
    pub fn render_error(&self, error: &str, pages: &[Page]) -> String {
        let head = Head {
            title: self.document_title("500 - Server Error"),
            description: &self.config.description,
            extra: String::new(),
        };
        let mut body = String::from("<h1>500 - Server Error</h1>\n<p>Something went wrong on our end.</p>\n");
        if !error.is_empty() {
            body.push_str(&format!("<pre>{}</pre>\n", escape_code(error)));
        }
        self.layout(head, &body, pages)
    }

    fn layout(&self, head: Head<'_>, body: &str, pages: &[Page]) -> String {
        let mut extra = head.extra;
        let favicon = favicon_tag(self.config.favicon.as_ref());
        if !favicon.is_empty() {
            if !extra.is_empty() {
                extra.push('\n');
            }
            extra.push_str(&favicon);
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<meta name="description" content="{description}">
{extra}
<style>{styles}</style>
</head>
<body>
{header}
{body}
</body>
</html>
"#,
            title = head.title,
            description = escape_html(head.description),
            extra = extra,
            styles = self.styles,
            header = self.render_header(pages),
            body = body,
        )
    }

    fn document_title(&self, title: &str) -> String {
        format!("{} - {}", escape_html(title), escape_html(&self.config.title))
    }

    /// Site title (or header art) followed by the navigation bar
    fn render_header(&self, pages: &[Page]) -> String {
        let title = match &self.config.ascii_title {
            Some(art) => format!(
                r#"<pre class="ascii-title"><a href="/">{}</a></pre>"#,
                escape_code(art)
            ),
            None => format!("<h1>{}</h1>", link_to("/", &self.config.title)),
        };

        let mut links = vec![link_to("/", "Index")];
        links.extend(
            pages
                .iter()
                .filter(|page| !page.hidden)
                .map(|page| link_to(&slug_path(&page.slug), &page.slug)),
        );

        let social = &self.config.social;
        if social.show_rss {
            links.push(link_to("/rss.xml", "RSS"));
        }
        if let Some(user) = &social.github {
            links.push(link_to(&format!("https://github.com/{}", user), "GitHub"));
        }
        if let Some(handle) = &social.twitter {
            links.push(link_to(&format!("https://twitter.com/{}", handle), "Twitter"));
        }

        format!("{}\n<nav>\n{}\n</nav>", title, links.join("\n"))
    }

    /// `YYYY-MM-DD - author`, plus a marker for drafts
    fn meta_line(&self, post: &Post) -> String {
        let mut line = format!("{} - {}", format_ymd(&post.date), escape_html(&post.author));
        if post.draft {
            line.push_str(r#" <span class="draft-tag">Draft</span>"#);
        }
        line
    }
}

fn render_tags(tags: &[String]) -> String {
    let spans: String = tags
        .iter()
        .map(|tag| format!("<span>{}</span>", escape_html(tag)))
        .collect();
    format!(r#"<div class="tags">{}</div>"#, spans)
}

/// Table of contents followed by a divider; empty when there are no entries
pub fn render_toc(toc: &[TocEntry]) -> String {
    if toc.is_empty() {
        return String::new();
    }

    let items: String = toc
        .iter()
        .map(|entry| {
            format!(
                "<div class=\"toc-item\" style=\"padding-left: {}em\">{}</div>\n",
                entry.level as f64 * 1.5,
                link_to(&format!("#{}", entry.id), &entry.text)
            )
        })
        .collect();

    format!(
        "<div class=\"toc\">\n{}</div>\n<div class=\"divider\">---</div>",
        items
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Favicon, SocialConfig};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn post(n: usize) -> Post {
        Post {
            title: format!("Post {}", n),
            slug: format!("post-{}", n),
            date: Utc.with_ymd_and_hms(2024, 1, n as u32 % 28 + 1, 0, 0, 0).unwrap(),
            author: "Ann".to_string(),
            tags: vec!["rust".to_string()],
            draft: false,
            description: format!("About post {}", n),
            url: format!("http://localhost:3000/post-{}", n),
            html: format!("<p>Body {}</p>\n", n),
            toc: None,
            source: PathBuf::from(format!("post-{}.md", n)),
        }
    }

    fn page(slug: &str, hidden: bool) -> Page {
        Page {
            title: slug.to_string(),
            slug: slug.to_string(),
            author: String::new(),
            draft: false,
            hidden,
            description: String::new(),
            url: format!("http://localhost:3000/{}", slug),
            html: format!("<p>{}</p>\n", slug),
            toc: None,
            source: PathBuf::from(format!("{}.md", slug)),
        }
    }

    fn renderer() -> PageRenderer {
        PageRenderer::new(SiteConfig {
            title: "My Blog".to_string(),
            description: "Notes".to_string(),
            ..SiteConfig::default()
        })
    }

    #[test]
    fn test_index_third_page() {
        let posts: Vec<Post> = (0..12).map(post).collect();
        let html = renderer().render_index(&posts, &[], 3);

        assert_eq!(html.matches(r#"<article class="post-preview">"#).count(), 2);
        assert!(html.contains(r#"<a href="/post-10">Post 10</a>"#));
        assert!(html.contains(r#"<a href="/post-11">Post 11</a>"#));
        assert!(html.contains(r#"<span class="current-page">3</span>"#));
        assert!(html.contains("<title>My Blog</title>"));
    }

    #[test]
    fn test_index_single_page_has_no_pagination() {
        let posts: Vec<Post> = (0..3).map(post).collect();
        let html = renderer().render_index(&posts, &[], 1);
        assert!(!html.contains(r#"class="pagination""#));
        assert!(html.contains(r#"<div class="meta-line">2024-01-02 - Ann</div>"#));
    }

    #[test]
    fn test_draft_markers() {
        let mut config = SiteConfig::default();
        config.preview_drafts = true;
        let mut draft = post(1);
        draft.draft = true;

        let html = PageRenderer::new(config).render_index(&[draft], &[], 1);
        assert!(html.contains("Draft Preview Mode Enabled"));
        assert!(html.contains(r#"<span class="draft-tag">Draft</span>"#));
    }

    #[test]
    fn test_header_navigation() {
        let mut config = SiteConfig::default();
        config.social = SocialConfig {
            show_rss: false,
            github: Some("octo".to_string()),
            twitter: None,
        };
        let pages = vec![page("about", false), page("secret", true)];

        let html = PageRenderer::new(config).render_not_found(&pages);
        assert!(html.contains(r#"<h1><a href="/">Blog</a></h1>"#));
        assert!(html.contains(r#"<a href="/about">about</a>"#));
        assert!(!html.contains(r#"href="/secret""#));
        assert!(!html.contains("/rss.xml"));
        assert!(html.contains(r#"<a href="https://github.com/octo">GitHub</a>"#));
        assert!(html.contains("404 - Not Found - Blog"));
    }

    #[test]
    fn test_ascii_title_header() {
        let mut config = SiteConfig::default();
        config.ascii_title = Some("<B>\n|_|".to_string());
        let html = PageRenderer::new(config).render_not_found(&[]);
        assert!(html.contains(r#"<pre class="ascii-title"><a href="/">&lt;B&gt;"#));
    }

    #[test]
    fn test_post_document() {
        let mut config = SiteConfig::default();
        config.og_image = Some("/static/og.png".to_string());
        config.favicon = Some(Favicon::Svg("/static/favicon.svg".to_string()));

        let mut p = post(1);
        p.toc = Some(vec![TocEntry {
            level: 1,
            text: "Setup".to_string(),
            id: "setup".to_string(),
        }]);

        let html = PageRenderer::new(config).render_post(&p, &[]);
        assert!(html.contains("╔══════════╗\n║  Post 1  ║\n╚══════════╝"));
        assert!(html.contains("<title>Post 1 - Blog</title>"));
        assert!(html.contains(r#"<meta property="og:title" content="Post 1">"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="http://localhost:3000/static/og.png">"#
        ));
        assert!(html.contains(r#"type="image/svg+xml""#));
        assert!(html.contains(r##"style="padding-left: 1.5em"><a href="#setup">Setup</a>"##));
        assert!(html.contains(r#"<div class="divider">---</div>"#));
        assert!(html.contains("<p>Body 1</p>"));
    }

    #[test]
    fn test_page_description_falls_back_to_blog() {
        let html = renderer().render_page(&page("about", false), &[]);
        assert!(html.contains(r#"<meta name="description" content="Notes">"#));
        assert!(html.contains("<p>about</p>"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = renderer().render_error("bad <input>", &[]);
        assert!(html.contains("<pre>bad &lt;input&gt;</pre>"));
        assert!(html.contains("500 - Server Error"));
    }

    #[test]
    fn test_render_toc_levels() {
        let toc = vec![
            TocEntry {
                level: 0,
                text: "A & B".to_string(),
                id: "a-b".to_string(),
            },
            TocEntry {
                level: 2,
                text: "C".to_string(),
                id: "c".to_string(),
            },
        ];
        let html = render_toc(&toc);
        assert!(html.contains(r##"padding-left: 0em"><a href="#a-b">A &amp; B</a>"##));
        assert!(html.contains(r##"padding-left: 3em"><a href="#c">C</a>"##));
        assert_eq!(render_toc(&[]), "");
    }
}
