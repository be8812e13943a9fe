//! mdposts: a markdown blog post store
//!
//! Posts are markdown files with YAML front-matter kept in one directory.
//! [`content::PostStore`] creates, lists and reads them; the `server` module
//! renders a single post as a page.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{MarkdownRenderer, PostStore};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding `<slug>.md` files
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        // join() keeps an absolute posts_dir as-is
        let posts_dir = base_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
        })
    }

    /// Build a post store over this site's posts directory
    pub fn store(&self) -> PostStore {
        let renderer = MarkdownRenderer::with_options(&self.config.highlight);
        PostStore::with_renderer(&self.posts_dir, renderer)
    }
}
