// src/ingest/fetcher.rs
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

use crate::ingest::types::{FeedTransport, RawItem, Source};

/// Retrieves one source through the transport. Failures never escape: a
/// source that cannot be fetched contributes an empty list.
#[derive(Clone)]
pub struct SourceFetcher {
    transport: Arc<dyn FeedTransport>,
    item_limit: usize,
}

impl SourceFetcher {
    pub fn new(transport: Arc<dyn FeedTransport>, item_limit: usize) -> Self {
        Self {
            transport,
            item_limit,
        }
    }

    pub fn item_limit(&self) -> usize {
        self.item_limit
    }

    pub async fn fetch(&self, source: &Source) -> Vec<RawItem> {
        let t0 = Instant::now();
        let res = self.transport.fetch_entries(&source.feed_url).await;
        histogram!("news_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        match res {
            Ok(entries) => {
                let items: Vec<RawItem> = entries
                    .into_iter()
                    .take(self.item_limit)
                    .map(|e| e.into_raw_item())
                    .collect();
                counter!("news_items_fetched_total").increment(items.len() as u64);
                tracing::debug!(
                    target: "ingest",
                    source = %source.name,
                    transport = self.transport.name(),
                    items = items.len(),
                    "source fetched"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    target: "ingest",
                    error = ?e,
                    source = %source.name,
                    transport = self.transport.name(),
                    "source fetch failed"
                );
                counter!("news_source_errors_total").increment(1);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::providers::fixture::FixtureTransport;

    fn rss_with(n: usize) -> String {
        let items: String = (0..n)
            .map(|i| {
                format!("<item><title>t{i}</title><link>https://x.test/{i}</link></item>")
            })
            .collect();
        format!(r#"<rss version="2.0"><channel>{items}</channel></rss>"#)
    }

    #[tokio::test]
    async fn caps_items_per_fetch() {
        let t = FixtureTransport::new().with_feed("https://x.test/rss", &rss_with(8));
        let f = SourceFetcher::new(Arc::new(t), 5);
        let out = f.fetch(&Source::new("X", "https://x.test/rss", "c")).await;
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].title, "t0");
        assert_eq!(out[4].link, "https://x.test/4");
    }

    #[tokio::test]
    async fn transport_error_degrades_to_empty() {
        let f = SourceFetcher::new(Arc::new(FixtureTransport::new()), 5);
        let out = f.fetch(&Source::new("X", "https://down.test/rss", "c")).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_degrades_to_empty() {
        let t = FixtureTransport::new().with_feed("https://x.test/rss", "<rss><channel><item>");
        let f = SourceFetcher::new(Arc::new(t), 5);
        assert!(f.fetch(&Source::new("X", "https://x.test/rss", "c")).await.is_empty());
    }
}
