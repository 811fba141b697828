//! HTTP server
//!
//! Every request asks the content cache for the current snapshot, which
//! rescans the content directories at most once per check interval.
//! Failures to load content render the error page instead of bubbling up
//! to axum.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::cache::{ContentCache, ContentSnapshot};
use crate::content::{ContentLoader, Document, Page};
use crate::error::BlogError;
use crate::generator::{generate_rss, generate_sitemap};
use crate::templates::{parse_page_param, PageRenderer};
use crate::Blog;

/// Static files may be cached by clients for a day
const STATIC_CACHE_CONTROL: &str = "public, max-age=86400";

/// Server state shared by all handlers
pub struct AppState {
    pub cache: ContentCache,
    pub renderer: PageRenderer,
}

type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(blog: &Blog) -> Self {
        Self {
            cache: ContentCache::new(ContentLoader::new(blog)),
            renderer: PageRenderer::new(blog.config.clone()),
        }
    }

    /// Fresh content, or the rendered error page
    async fn content(&self, context: &str) -> std::result::Result<Arc<ContentSnapshot>, Response> {
        self.cache
            .get()
            .await
            .map_err(|e| self.error_response(context, &e))
    }

    fn error_response(&self, context: &str, error: &BlogError) -> Response {
        tracing::error!("Error {}: {}", context, error);

        // Keep the navigation from the last good load, if there was one
        let snapshot = self.cache.current();
        let pages = snapshot.as_deref().map_or(&[][..], |s| s.pages.as_slice());
        let html = self.renderer.render_error(&error.to_string(), pages);
        (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
    }

    fn not_found_response(&self, pages: &[Page]) -> Response {
        let html = self.renderer.render_not_found(pages);
        (StatusCode::NOT_FOUND, Html(html)).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, static_dir: &std::path::Path) -> Router {
    let static_files = Router::new()
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        ));

    Router::new()
        .route("/", get(index_handler))
        .route("/rss.xml", get(rss_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/:slug", get(slug_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(blog));

    // Load once up front so broken content shows up in the log right away
    match state.cache.get().await {
        Ok(content) => tracing::debug!(
            "Serving {} posts and {} pages",
            content.posts.len(),
            content.pages.len()
        ),
        Err(e) => tracing::warn!("Initial content load failed: {}", e),
    }

    let app = router(state, &blog.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
    }
    tracing::info!("Shutting down");
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    page: Option<String>,
}

async fn index_handler(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> Response {
    let content = match state.content("rendering index").await {
        Ok(content) => content,
        Err(response) => return response,
    };

    let page = parse_page_param(query.page.as_deref());
    Html(state.renderer.render_index(&content.posts, &content.pages, page)).into_response()
}

async fn rss_handler(State(state): State<SharedState>) -> Response {
    let content = match state.content("generating RSS").await {
        Ok(content) => content,
        Err(response) => return response,
    };

    let xml = generate_rss(state.renderer.config(), &content.posts);
    xml_response(xml)
}

async fn sitemap_handler(State(state): State<SharedState>) -> Response {
    let content = match state.content("generating sitemap").await {
        Ok(content) => content,
        Err(response) => return response,
    };

    xml_response(generate_sitemap(&content.posts, &content.pages))
}

/// Serve a post or page by slug, honouring `If-None-Match`
async fn slug_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let content = match state.content("rendering post/page").await {
        Ok(content) => content,
        Err(response) => return response,
    };

    let Some(document) = content.find(&slug) else {
        return state.not_found_response(&content.pages);
    };

    let etag = content
        .etag(document.slug())
        .and_then(|tag| HeaderValue::from_str(&format!("\"{}\"", tag)).ok());

    if let Some(etag) = &etag {
        if etag_matches(&headers, etag) {
            return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag.clone())]).into_response();
        }
    }

    let html = match document {
        Document::Post(post) => state.renderer.render_post(post, &content.pages),
        Document::Page(page) => state.renderer.render_page(page, &content.pages),
    };

    let mut response = Html(html).into_response();
    if let Some(etag) = etag {
        response.headers_mut().insert(header::ETAG, etag);
    }
    response
}

async fn not_found_handler(State(state): State<SharedState>) -> Response {
    match state.content("rendering 404 page").await {
        Ok(content) => state.not_found_response(&content.pages),
        Err(response) => response,
    }
}

fn xml_response(xml: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

/// Whether any tag in `If-None-Match` names `etag` (weak tags compare equal)
fn etag_matches(headers: &HeaderMap, etag: &HeaderValue) -> bool {
    let Ok(etag) = etag.to_str() else {
        return false;
    };

    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim())
        .any(|tag| tag == "*" || tag.trim_start_matches("W/") == etag)
}
