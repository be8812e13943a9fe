//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Site title shown on the index page
    pub title: String,

    /// Where post files live, relative to the site directory unless absolute
    pub posts_dir: String,

    /// chrono format used when displaying post dates on the index
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            posts_dir: "posts".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: BlogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// The YAML written by `init`
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub line_number: bool,
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            line_number: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Page server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.title, "Blog");
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.server.port, 4000);
        assert!(config.highlight.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
posts_dir: content/posts
highlight:
  line_number: true
server:
  port: 8080
analytics: abc123
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.posts_dir, "content/posts");
        assert!(config.highlight.line_number);
        assert!(config.highlight.enable);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_load_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, BlogConfig::default().to_yaml().unwrap()).unwrap();

        let config = BlogConfig::load(&path).unwrap();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "server: [not, a, map").unwrap();

        let err = BlogConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
