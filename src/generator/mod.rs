//! Feed generators - RSS and sitemap XML

mod rss;
mod sitemap;

pub use self::rss::generate_rss;
pub use self::sitemap::generate_sitemap;
