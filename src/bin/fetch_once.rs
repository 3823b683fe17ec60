//! Run one aggregation against the configured feeds and print the JSON
//! snapshot to stdout. Logs go to stderr.

use ai_news_aggregator::{init_tracing, NewsAggregator, NewsConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = NewsConfig::load_default()?;
    let aggregator = NewsAggregator::from_config(&cfg)?;

    let snapshot = aggregator.snapshot().await;
    if snapshot.articles.is_empty() {
        tracing::warn!(target: "news", "no articles could be collected");
    }

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
