//! Page server: binds URL slugs to the post store

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::fmt::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::content::{html_escape, Post, PostStore, PostSummary};
use crate::error::PostError;
use crate::Blog;

/// Server state
struct ServerState {
    store: PostStore,
    site_title: String,
    date_format: String,
}

/// Error returned from handlers
struct PageError(PostError);

impl From<PostError> for PageError {
    fn from(err: PostError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if self.0.is_not_found() {
            tracing::debug!("{}", self.0);
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }

        tracing::error!("{}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// Build the router over a post store
pub fn router(store: PostStore, config: &BlogConfig) -> Router {
    let state = Arc::new(ServerState {
        store,
        site_title: config.title.clone(),
        date_format: config.date_format.clone(),
    });

    Router::new()
        .route("/", get(index_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/api/posts", get(api_list_handler))
        .route("/api/posts/:slug", get(api_post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the page server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog.store(), &blog.config);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Result<Html<String>, PageError> {
    let mut posts = state.store.list().await?;
    // Newest first, undated posts last
    posts.sort_by(|a, b| b.frontmatter.parse_date().cmp(&a.frontmatter.parse_date()));
    Ok(Html(render_index(
        &state.site_title,
        &posts,
        &state.date_format,
    )))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let post = state.store.get(checked_slug(&state, &slug)?).await?;
    Ok(Html(render_post(&post)))
}

async fn api_list_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<PostSummary>>, PageError> {
    Ok(Json(state.store.list().await?))
}

async fn api_post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, PageError> {
    let post = state.store.get(checked_slug(&state, &slug)?).await?;
    Ok(Json(post))
}

/// Slugs from the URL must stay inside the posts directory
fn checked_slug<'a>(state: &ServerState, slug: &'a str) -> Result<&'a str, PageError> {
    if slug.is_empty() || slug.starts_with('.') || slug.contains(['/', '\\']) {
        return Err(PageError(PostError::NotFound {
            slug: slug.to_string(),
            path: state.store.posts_dir().to_path_buf(),
        }));
    }
    Ok(slug)
}

/// Render a single post page. The post html is trusted and inserted as-is.
pub fn render_post(post: &Post) -> String {
    let title = html_escape(&post.title);
    let date = post
        .frontmatter
        .date
        .as_deref()
        .map(|d| format!("<h2>{}</h2>\n", html_escape(d)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<div>
<h1>{title}</h1>
{date}<div>{html}</div>
</div>
</body>
</html>
"#,
        title = title,
        date = date,
        html = post.html
    )
}

/// Render the index page listing every post
pub fn render_index(site_title: &str, posts: &[PostSummary], date_format: &str) -> String {
    let mut items = String::new();
    for post in posts {
        let date = match post.frontmatter.parse_date() {
            Some(dt) => {
                let mut formatted = String::new();
                // chrono reports bad format strings through fmt::Error
                if write!(formatted, "{}", dt.format(date_format)).is_err() {
                    formatted = post.frontmatter.date.clone().unwrap_or_default();
                }
                format!(" <time>{}</time>", html_escape(&formatted))
            }
            None => String::new(),
        };
        let _ = writeln!(
            items,
            r#"<li><a href="/posts/{}">{}</a>{}</li>"#,
            html_escape(&post.slug),
            html_escape(&post.title),
            date
        );
    }

    let site_title = html_escape(site_title);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{site_title}</title>
</head>
<body>
<h1>{site_title}</h1>
<ul>
{items}</ul>
</body>
</html>
"#,
        site_title = site_title,
        items = items
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{NewPost, PostAttributes};
    use axum::body::Body;
    use axum::http::Request;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_path(dir: &TempDir, uri: &str) -> (StatusCode, String) {
        let app = router(PostStore::new(dir.path()), &BlogConfig::default());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn summary(slug: &str, title: &str, date: Option<&str>) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: title.to_string(),
            frontmatter: PostAttributes {
                title: title.to_string(),
                date: date.map(str::to_string),
                extra: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn test_render_post_escapes_title_not_html() {
        let post = Post {
            slug: "x".to_string(),
            html: "<p>raw <em>html</em></p>\n".to_string(),
            title: "Tom & Jerry <3".to_string(),
            frontmatter: PostAttributes {
                title: "Tom & Jerry <3".to_string(),
                date: Some("2024-01-02".to_string()),
                extra: BTreeMap::new(),
            },
        };

        let page = render_post(&post);
        assert!(page.contains("<h1>Tom &amp; Jerry &lt;3</h1>"));
        assert!(page.contains("<h2>2024-01-02</h2>"));
        assert!(page.contains("<p>raw <em>html</em></p>"));
    }

    #[test]
    fn test_render_post_without_date() {
        let mut post = Post {
            slug: "x".to_string(),
            html: String::new(),
            title: "Undated".to_string(),
            frontmatter: PostAttributes {
                title: "Undated".to_string(),
                date: None,
                extra: BTreeMap::new(),
            },
        };
        assert!(!render_post(&post).contains("<h2>"));

        post.frontmatter.date = Some("soon".to_string());
        assert!(render_post(&post).contains("<h2>soon</h2>"));
    }

    #[test]
    fn test_render_index_formats_dates() {
        let posts = vec![
            summary("a", "A", Some("2024-03-04 05:06:07")),
            summary("b", "B", Some("whenever")),
        ];
        let page = render_index("My <Blog>", &posts, "%d/%m/%Y");
        assert!(page.contains("<h1>My &lt;Blog&gt;</h1>"));
        assert!(page.contains(r#"<li><a href="/posts/a">A</a> <time>04/03/2024</time></li>"#));
        assert!(page.contains(r#"<li><a href="/posts/b">B</a></li>"#));
    }

    #[tokio::test]
    async fn test_post_page() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("hello.md"),
            "---\ntitle: Hello World\ndate: 2024-01-15\n---\n\n# Hi\n",
        )
        .unwrap();

        let (status, body) = get_path(&dir, "/posts/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Hello World</h1>"));
        assert!(body.contains("<h2>2024-01-15</h2>"));
        assert!(body.contains("<h1>Hi</h1>"));
    }

    #[tokio::test]
    async fn test_missing_post_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, _) = get_path(&dir, "/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_path(&dir, "/posts/..%2Fsecret").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_frontmatter_is_500() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.md"), "no front-matter\n").unwrap();

        let (status, body) = get_path(&dir, "/posts/bad").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("bad.md"));

        let (status, _) = get_path(&dir, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_index_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::new(dir.path());
        store.create(&NewPost::new("Old", "old")).await.unwrap();
        std::fs::write(
            dir.path().join("new.md"),
            "---\ntitle: New\ndate: 2024-06-01\n---\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("older.md"),
            "---\ntitle: Older\ndate: 2023-06-01\n---\n",
        )
        .unwrap();

        let (status, body) = get_path(&dir, "/").await;
        assert_eq!(status, StatusCode::OK);
        let new = body.find("/posts/new").unwrap();
        let older = body.find("/posts/older").unwrap();
        let old = body.find(r#"/posts/old""#).unwrap();
        assert!(new < older);
        assert!(older < old);
    }

    #[tokio::test]
    async fn test_api_endpoints() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::new(dir.path());
        store
            .create(&NewPost::new("Api", "api").with_markdown("*hi*"))
            .await
            .unwrap();

        let (status, body) = get_path(&dir, "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json[0]["slug"], "api");
        assert_eq!(json[0]["frontmatter"]["title"], "Api");
        assert!(json[0].get("html").is_none());

        let (status, body) = get_path(&dir, "/api/posts/api").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["html"], "<p><em>hi</em></p>\n");
    }
}
