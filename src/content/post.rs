//! Post models

use serde::{Deserialize, Serialize};

use super::PostAttributes;

/// A single post, read and rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// File stem of `<slug>.md`
    pub slug: String,

    /// Rendered HTML body
    pub html: String,

    /// Post title (also present in `frontmatter`)
    pub title: String,

    /// Validated front-matter
    pub frontmatter: PostAttributes,
}

/// What `list()` returns: metadata only, no body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub frontmatter: PostAttributes,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            frontmatter: post.frontmatter,
        }
    }
}

/// Input for creating a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,

    /// Used verbatim as the file stem
    pub slug: String,

    /// Markdown body; `None` writes an empty body
    #[serde(default)]
    pub markdown: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            markdown: None,
        }
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }
}
