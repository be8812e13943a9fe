//! List posts

use anyhow::Result;

use crate::content::PostSummary;
use crate::Blog;

/// Print every post, one per line, or as a JSON array
pub async fn run(blog: &Blog, json: bool) -> Result<()> {
    let posts = blog.store().list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        println!("Posts ({}):", posts.len());
        for post in &posts {
            println!("{}", format_line(post));
        }
    }

    Ok(())
}

fn format_line(post: &PostSummary) -> String {
    match &post.frontmatter.date {
        Some(date) => format!("  {} - {} [{}]", date, post.title, post.slug),
        None => format!("  {} [{}]", post.title, post.slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostAttributes;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_line() {
        let mut post = PostSummary {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            frontmatter: PostAttributes {
                title: "Hello".to_string(),
                date: None,
                extra: BTreeMap::new(),
            },
        };
        assert_eq!(format_line(&post), "  Hello [hello]");

        post.frontmatter.date = Some("2024-01-01".to_string());
        assert_eq!(format_line(&post), "  2024-01-01 - Hello [hello]");
    }

    #[tokio::test]
    async fn test_run_fails_on_bad_post() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("posts")).unwrap();
        std::fs::write(dir.path().join("posts/bad.md"), "---\n---\nbody\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let err = run(&blog, false).await.unwrap_err();
        assert!(err.to_string().contains("bad.md"));
    }
}
