//! Error types for the post store

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::content::PostStore`]
#[derive(Debug, Error)]
pub enum PostError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Post not found: {slug} ({path:?})")]
    NotFound { slug: String, path: PathBuf },

    #[error("Post {path:?} has bad front-matter: {source}")]
    InvalidFrontMatter {
        path: PathBuf,
        #[source]
        source: AttributeError,
    },

    #[error("Failed to serialize front-matter: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl PostError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PostError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the requested post file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::NotFound { .. })
    }

    /// True when a post file lacks a usable `title`
    pub fn is_missing_title(&self) -> bool {
        matches!(
            self,
            PostError::InvalidFrontMatter {
                source: AttributeError::MissingTitle | AttributeError::InvalidTitle,
                ..
            }
        )
    }
}

/// Reasons a parsed front-matter mapping is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("missing required field `title`")]
    MissingTitle,

    #[error("field `title` must be a non-empty string")]
    InvalidTitle,

    #[error("field `date` must be a scalar value")]
    InvalidDate,
}

/// Result type using PostError
pub type Result<T> = std::result::Result<T, PostError>;
