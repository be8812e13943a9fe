//! Content module - post files, front-matter, and markdown rendering

pub mod frontmatter;
mod markdown;
mod post;
mod store;

pub use frontmatter::{validate_attributes, FrontMatter, PostAttributes};
pub use markdown::{html_escape, MarkdownRenderer};
pub use post::{NewPost, Post, PostSummary};
pub use store::PostStore;
