//! asciiblog: a markdown blog server with box-drawn headings
//!
//! Posts and pages are read from plain markdown files, rendered once per
//! content change and served from an in-memory snapshot together with an
//! RSS feed and a sitemap.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::BlogError;

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub posts_dir: PathBuf,
    /// Markdown pages
    pub pages_dir: PathBuf,
    /// Files served under /static
    pub static_dir: PathBuf,
}

impl Blog {
    /// Create a new blog rooted at `base_dir`, reading configuration from
    /// the environment and `<base_dir>/.env`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::from_env(&base_dir)?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog with an already assembled configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            config,
            posts_dir: base_dir.join("posts"),
            pages_dir: base_dir.join("pages"),
            static_dir: base_dir.join("static"),
            base_dir,
        }
    }
}
