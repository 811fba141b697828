//! Sitemap generation
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/hello</loc>
//!     <lastmod>2024-01-15</lastmod>
//!     <changefreq>weekly</changefreq>
//!   </url>
//! </urlset>
//! ```

use crate::content::{Page, Post};
use crate::helpers::format_ymd;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

struct UrlEntry<'a> {
    loc: &'a str,
    /// YYYY-MM-DD, posts only
    lastmod: Option<String>,
}

/// Render the sitemap: every post, then every page
pub fn generate_sitemap(posts: &[Post], pages: &[Page]) -> String {
    let entries = posts
        .iter()
        .map(|post| UrlEntry {
            loc: &post.url,
            lastmod: Some(format_ymd(&post.date)),
        })
        .chain(pages.iter().map(|page| UrlEntry {
            loc: &page.url,
            lastmod: None,
        }));

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(entry.loc)));
        if let Some(lastmod) = entry.lastmod {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }
        xml.push_str("    <changefreq>weekly</changefreq>\n");
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
