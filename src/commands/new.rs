//! Create a new post

use anyhow::{Context, Result};
use std::path::Path;

use crate::content::{NewPost, Post};
use crate::Blog;

/// Create a post, overwriting any post with the same slug.
///
/// The slug defaults to the slugified title; the body is read from `file`
/// when given.
pub async fn create_post(
    blog: &Blog,
    title: &str,
    slug: Option<&str>,
    file: Option<&Path>,
) -> Result<Post> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}, pass --slug", title);
    }

    let mut input = NewPost::new(title, slug);
    if let Some(path) = file {
        let markdown = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;
        input = input.with_markdown(markdown);
    }

    let post = blog.store().create(&input).await?;
    tracing::info!("Created post {} in {:?}", post.slug, blog.posts_dir);

    Ok(post)
}
