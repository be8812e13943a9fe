//! File-backed post store
//!
//! One markdown file per post, `<slug>.md`, inside a single directory. The
//! store owns that directory: it never creates or removes it, and there is
//! no locking, so concurrent writes to the same slug are last-write-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::frontmatter::{serialize_front_matter, validate_attributes};
use super::{FrontMatter, MarkdownRenderer, NewPost, Post, PostAttributes, PostSummary};
use crate::error::{PostError, Result};

/// Create, list and read posts in a directory
pub struct PostStore {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl PostStore {
    /// Create a store over `posts_dir` with the default renderer
    pub fn new<P: Into<PathBuf>>(posts_dir: P) -> Self {
        Self::with_renderer(posts_dir, MarkdownRenderer::new())
    }

    pub fn with_renderer<P: Into<PathBuf>>(posts_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            renderer,
        }
    }

    /// Directory holding the post files
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    fn post_path(&self, slug: &str) -> PathBuf {
        self.posts_dir.join(format!("{}.md", slug))
    }

    /// Write `<slug>.md`, replacing any existing file, and return the post as
    /// read back from disk.
    pub async fn create(&self, input: &NewPost) -> Result<Post> {
        let path = self.post_path(&input.slug);
        let contents = format!(
            "{}\n{}",
            serialize_front_matter(&input.title)?,
            input.markdown.as_deref().unwrap_or_default()
        );

        tracing::debug!("Writing post {:?}", path);
        fs::write(&path, contents)
            .await
            .map_err(|e| PostError::io(&path, e))?;

        self.get(&input.slug).await
    }

    /// Summaries of every entry in the posts directory, in directory order.
    ///
    /// Every entry is treated as a post. The first one without a valid
    /// `title` fails the whole call.
    pub async fn list(&self) -> Result<Vec<PostSummary>> {
        tracing::debug!("Listing posts in {:?}", self.posts_dir);

        let mut dir = fs::read_dir(&self.posts_dir)
            .await
            .map_err(|e| PostError::io(&self.posts_dir, e))?;

        let mut posts = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| PostError::io(&self.posts_dir, e))?
        {
            let path = entry.path();
            let content = read_post_file(&path).await?;
            let (frontmatter, _) = parse_post(&path, &content)?;

            let filename = entry.file_name().to_string_lossy().into_owned();
            let slug = filename
                .strip_suffix(".md")
                .unwrap_or(&filename)
                .to_string();

            posts.push(PostSummary {
                slug,
                title: frontmatter.title.clone(),
                frontmatter,
            });
        }

        Ok(posts)
    }

    /// Read and render `<slug>.md`
    pub async fn get(&self, slug: &str) -> Result<Post> {
        let path = self.post_path(slug);
        tracing::debug!("Reading post {:?}", path);

        let content = match read_post_file(&path).await {
            Ok(content) => content,
            Err(PostError::Io { source, path }) if source.kind() == ErrorKind::NotFound => {
                return Err(PostError::NotFound {
                    slug: slug.to_string(),
                    path,
                });
            }
            Err(e) => return Err(e),
        };

        let (frontmatter, body) = parse_post(&path, &content)?;
        let html = self.renderer.render(&body);

        Ok(Post {
            slug: slug.to_string(),
            html,
            title: frontmatter.title.clone(),
            frontmatter,
        })
    }
}

async fn read_post_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await.map_err(|e| PostError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_post(path: &Path, content: &str) -> Result<(PostAttributes, String)> {
    let FrontMatter { attributes, body } = FrontMatter::parse(content);
    let frontmatter =
        validate_attributes(&attributes).map_err(|source| PostError::InvalidFrontMatter {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((frontmatter, body))
}
