use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregator::{NewsAggregator, NewsSnapshot};
use crate::render::{HtmlCardRenderer, Renderer};

pub const DEFAULT_SURFACE: &str = "news-container";

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<NewsAggregator>,
    pub renderer: Arc<HtmlCardRenderer>,
}

impl AppState {
    pub fn new(aggregator: NewsAggregator, renderer: HtmlCardRenderer) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            renderer: Arc::new(renderer),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(news_json))
        .route("/news", get(news_html))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct SurfaceQuery {
    #[serde(default)]
    surface: Option<String>,
}

impl SurfaceQuery {
    fn surface(&self) -> &str {
        self.surface
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SURFACE)
    }
}

// Each request runs a fresh aggregation; nothing is cached between calls.
async fn news_json(State(state): State<AppState>) -> Json<NewsSnapshot> {
    Json(state.aggregator.snapshot().await)
}

async fn news_html(State(state): State<AppState>, Query(q): Query<SurfaceQuery>) -> Html<String> {
    let result = state.aggregator.aggregate().await;
    Html(state.renderer.render(q.surface(), &result.articles))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let placeholder = state.renderer.loading(DEFAULT_SURFACE);
    Html(format!(
        r#"<!doctype html>
<html lang="{lang}">
<head><meta charset="utf-8"><title>AI News</title></head>
<body>
{placeholder}
<script>
fetch('/news?surface={surface}')
  .then(function (r) {{ return r.text(); }})
  .then(function (html) {{ document.getElementById('{surface}').outerHTML = html; }});
</script>
</body>
</html>"#,
        surface = DEFAULT_SURFACE,
        lang = state.renderer.labels().locale.tag(),
    ))
}
