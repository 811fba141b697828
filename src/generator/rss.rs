//! RSS 2.0 feed

use chrono::{Datelike, Utc};
use rss::{ChannelBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::format_rfc2822;

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Render the feed for the given posts
///
/// Drafts are only included while draft preview is enabled.
pub fn generate_rss(config: &SiteConfig, posts: &[Post]) -> String {
    let items: Vec<Item> = posts
        .iter()
        .filter(|post| !post.draft || config.preview_drafts)
        .map(post_to_item)
        .collect();

    let image = config.og_image_url().map(|url| {
        ImageBuilder::default()
            .url(url)
            .title(config.rss.title.clone())
            .link(config.url.clone())
            .build()
    });

    let mut namespaces = BTreeMap::new();
    namespaces.insert("content".to_string(), CONTENT_NS.to_string());

    let channel = ChannelBuilder::default()
        .title(&config.rss.title)
        .link(&config.url)
        .description(&config.rss.description)
        .language(config.rss.language.clone())
        .copyright(format!(
            "All rights reserved {}, {}",
            Utc::now().year(),
            config.author
        ))
        .generator("asciiblog".to_string())
        .image(image)
        .namespaces(namespaces)
        .items(items)
        .build();

    channel.to_string()
}

fn post_to_item(post: &Post) -> Item {
    ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(post.url.clone()))
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(post.url.clone())
                .build(),
        )
        .description(post.description.clone())
        .content(post.html.clone())
        .author(post.author.clone())
        .pub_date(format_rfc2822(&post.date))
        .build()
}
