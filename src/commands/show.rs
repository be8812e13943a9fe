//! Print a rendered post

use anyhow::Result;

use crate::server::render_post;
use crate::Blog;

/// Print the post body as HTML, or the full page with `page`
pub async fn run(blog: &Blog, slug: &str, page: bool) -> Result<()> {
    let post = blog.store().get(slug).await?;

    if page {
        print!("{}", render_post(&post));
    } else {
        print!("{}", post.html);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_missing_post() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("posts")).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let err = run(&blog, "ghost", false).await.unwrap_err();
        let err = err.downcast::<crate::error::PostError>().unwrap();
        assert!(err.is_not_found());
    }
}
