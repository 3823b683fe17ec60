//! AI news service binary entrypoint.
//! Loads the news configuration (fatal if invalid), then serves the card
//! widget, the JSON snapshot and Prometheus metrics over Axum.

use ai_news_aggregator::api::{self, AppState};
use ai_news_aggregator::metrics::Metrics;
use ai_news_aggregator::render::{CardLabels, HtmlCardRenderer};
use ai_news_aggregator::{init_tracing, NewsAggregator, NewsConfig};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Configuration defects stop the service here, never mid-aggregation.
    let cfg = NewsConfig::load_default()?;
    let aggregator = NewsAggregator::from_config(&cfg)?;
    tracing::info!(
        target: "news",
        sources = aggregator.sources().len(),
        transport = ?cfg.transport.mode,
        max_articles = cfg.limits.max_articles,
        "news aggregator ready"
    );

    let metrics = Metrics::init(&cfg.limits)?;

    let labels = CardLabels::for_locale(cfg.locale);
    let state = AppState::new(aggregator, HtmlCardRenderer::new(labels, "/"));
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
