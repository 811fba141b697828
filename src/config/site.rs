//! Site configuration assembled from environment variables

use std::fs;
use std::path::Path;

use super::env_file::load_env_file;
use crate::error::{BlogError, Result};

/// Main site configuration
///
/// Built once at startup and handed to every component that renders or
/// links content; nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Absolute base URL without a trailing slash
    pub url: String,
    pub author: String,

    // Listing
    pub per_page: usize,
    pub preview_drafts: bool,

    // Head
    pub og_image: Option<String>,
    pub favicon: Option<Favicon>,
    /// Pre-formatted header art, read from `ASCII_TITLE_PATH`
    pub ascii_title: Option<String>,

    pub theme: ThemeConfig,
    pub rss: RssConfig,
    pub social: SocialConfig,

    // Server
    pub port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            url: "http://localhost:3000".to_string(),
            author: String::new(),

            per_page: 5,
            preview_drafts: false,

            og_image: None,
            favicon: None,
            ascii_title: None,

            theme: ThemeConfig::default(),
            rss: RssConfig {
                title: "Blog".to_string(),
                description: String::new(),
                language: "en".to_string(),
            },
            social: SocialConfig::default(),

            port: 3000,
        }
    }
}

impl SiteConfig {
    /// Read the configuration from the process environment, falling back to
    /// `<base_dir>/.env` for keys the environment does not define
    pub fn from_env<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let file_vars = load_env_file(base_dir.as_ref().join(".env"))?;
        Self::from_lookup(base_dir, |key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Build the configuration from an arbitrary variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup<P, F>(base_dir: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag_off = |key: &str| get(key).is_some_and(|v| v == "false");
        let defaults = Self::default();

        let title = get("BLOG_TITLE").unwrap_or(defaults.title);
        let description = get("BLOG_DESCRIPTION").unwrap_or(defaults.description);
        let url = get("BLOG_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.url);

        let per_page = match get("PAGINATION_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(BlogError::Config(format!(
                        "PAGINATION_LIMIT must be a positive integer, got `{raw}`"
                    )))
                }
            },
            None => defaults.per_page,
        };

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                BlogError::Config(format!("PORT must be a valid port number, got `{raw}`"))
            })?,
            None => defaults.port,
        };

        let favicon = get("FAVICON_SVG")
            .map(Favicon::Svg)
            .or_else(|| get("FAVICON_PATH").map(Favicon::Path))
            .or_else(|| get("FAVICON_BASE64").map(Favicon::Base64));

        let theme = ThemeConfig {
            font_family: get("THEME_FONT_FAMILY").unwrap_or(defaults.theme.font_family),
            background: get("THEME_BACKGROUND").unwrap_or(defaults.theme.background),
            text: get("THEME_TEXT").unwrap_or(defaults.theme.text),
            link: get("THEME_LINK").unwrap_or(defaults.theme.link),
        };

        let rss = RssConfig {
            title: get("RSS_TITLE").unwrap_or_else(|| title.clone()),
            description: get("RSS_DESCRIPTION").unwrap_or_else(|| description.clone()),
            language: get("RSS_LANGUAGE").unwrap_or(defaults.rss.language),
        };

        let social = SocialConfig {
            show_rss: !flag_off("SHOW_RSS"),
            github: get("BLOG_GITHUB").filter(|_| !flag_off("SHOW_GITHUB")),
            twitter: get("BLOG_TWITTER").filter(|_| !flag_off("SHOW_TWITTER")),
        };

        let ascii_title = get("ASCII_TITLE_PATH")
            .and_then(|path| load_ascii_title(&base_dir.as_ref().join(path)));

        Ok(Self {
            title,
            description,
            url,
            author: get("BLOG_AUTHOR").unwrap_or(defaults.author),
            per_page,
            preview_drafts: get("PREVIEW_DRAFTS").is_some_and(|v| v == "true"),
            og_image: get("OG_IMAGE"),
            favicon,
            ascii_title,
            theme,
            rss,
            social,
            port,
        })
    }

    /// Absolute URL of the Open Graph image, if one is configured
    pub fn og_image_url(&self) -> Option<String> {
        self.og_image
            .as_ref()
            .map(|path| format!("{}{}", self.url, path))
    }
}

/// Read the header art; a missing or unreadable file falls back to the
/// plain title header
fn load_ascii_title(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(art) => Some(art.trim_end().to_string()),
        Err(e) => {
            tracing::warn!("Failed to load ASCII title from {:?}: {}", path, e);
            None
        }
    }
}

/// Colors and font used by the inline stylesheet
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub font_family: String,
    pub background: String,
    pub text: String,
    pub link: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            background: "#000000".to_string(),
            text: "#ffffff".to_string(),
            link: "#ffffff".to_string(),
        }
    }
}

/// Site icon; the first configured form wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Favicon {
    Svg(String),
    Path(String),
    Base64(String),
}

/// RSS channel settings
#[derive(Debug, Clone)]
pub struct RssConfig {
    pub title: String,
    pub description: String,
    pub language: String,
}

/// Links shown in the navigation bar
#[derive(Debug, Clone)]
pub struct SocialConfig {
    pub show_rss: bool,
    /// GitHub user name, only set when the link should be shown
    pub github: Option<String>,
    /// Twitter handle, only set when the link should be shown
    pub twitter: Option<String>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            show_rss: true,
            github: None,
            twitter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SiteConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SiteConfig::from_lookup("/nonexistent", |key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.title, "Blog");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.port, 3000);
        assert!(!config.preview_drafts);
        assert!(config.social.show_rss);
        assert_eq!(config.rss.language, "en");
        assert!(config.favicon.is_none());
    }

    #[test]
    fn test_parse_config() {
        let config = config_from(&[
            ("BLOG_TITLE", "My Blog"),
            ("BLOG_URL", "https://example.com/"),
            ("PAGINATION_LIMIT", "20"),
            ("PREVIEW_DRAFTS", "true"),
            ("PORT", "8080"),
            ("THEME_LINK", "#ff0000"),
        ])
        .unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.per_page, 20);
        assert!(config.preview_drafts);
        assert_eq!(config.port, 8080);
        assert_eq!(config.theme.link, "#ff0000");
        assert_eq!(config.theme.background, "#000000");
    }

    #[test]
    fn test_rss_falls_back_to_blog_settings() {
        let config = config_from(&[
            ("BLOG_TITLE", "My Blog"),
            ("BLOG_DESCRIPTION", "Notes"),
            ("RSS_DESCRIPTION", ""),
        ])
        .unwrap();
        assert_eq!(config.rss.title, "My Blog");
        assert_eq!(config.rss.description, "Notes");
    }

    #[test]
    fn test_invalid_pagination_limit() {
        assert!(matches!(
            config_from(&[("PAGINATION_LIMIT", "0")]),
            Err(BlogError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("PAGINATION_LIMIT", "five")]),
            Err(BlogError::Config(_))
        ));
    }

    #[test]
    fn test_favicon_priority() {
        let config = config_from(&[
            ("FAVICON_PATH", "/static/favicon.ico"),
            ("FAVICON_BASE64", "data:image/png;base64,AAA"),
        ])
        .unwrap();
        assert_eq!(
            config.favicon,
            Some(Favicon::Path("/static/favicon.ico".to_string()))
        );

        let config = config_from(&[
            ("FAVICON_SVG", "/static/favicon.svg"),
            ("FAVICON_PATH", "/static/favicon.ico"),
        ])
        .unwrap();
        assert_eq!(
            config.favicon,
            Some(Favicon::Svg("/static/favicon.svg".to_string()))
        );
    }

    #[test]
    fn test_social_links() {
        let config = config_from(&[
            ("BLOG_GITHUB", "octocat"),
            ("BLOG_TWITTER", "jack"),
            ("SHOW_TWITTER", "false"),
            ("SHOW_RSS", "false"),
        ])
        .unwrap();
        assert_eq!(config.social.github.as_deref(), Some("octocat"));
        assert_eq!(config.social.twitter, None);
        assert!(!config.social.show_rss);
    }

    #[test]
    fn test_ascii_title_loaded_from_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("title.txt"), " _ \n|_|\n\n").unwrap();
        let config = SiteConfig::from_lookup(dir.path(), |key| {
            (key == "ASCII_TITLE_PATH").then(|| "title.txt".to_string())
        })
        .unwrap();
        assert_eq!(config.ascii_title.as_deref(), Some(" _ \n|_|"));

        let config = SiteConfig::from_lookup(dir.path(), |key| {
            (key == "ASCII_TITLE_PATH").then(|| "missing.txt".to_string())
        })
        .unwrap();
        assert!(config.ascii_title.is_none());
    }

    #[test]
    fn test_env_file_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "RSS_LANGUAGE=de\n").unwrap();
        // RSS_LANGUAGE is not expected in the test environment
        if std::env::var("RSS_LANGUAGE").is_err() {
            let config = SiteConfig::from_env(dir.path()).unwrap();
            assert_eq!(config.rss.language, "de");
        }
    }
}
