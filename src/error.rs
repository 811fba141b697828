//! Error types shared by the content, cache and server layers

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("slug `{slug}` is used by both {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl BlogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BlogError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
