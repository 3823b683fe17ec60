// src/ingest/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::feed_xml::parse_feed;
use crate::ingest::types::{FeedEntry, FeedTransport};

pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; ai-news-aggregator/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Direct feed retrieval: GET the feed URL and parse the body.
#[derive(Clone)]
pub struct HttpFeedTransport {
    client: Client,
    timeout: Duration,
}

impl HttpFeedTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("building http client")?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<FeedEntry>> {
        let body = self
            .client
            .get(feed_url)
            .timeout(self.timeout)
            .send()
            .await
            .context("feed http get()")?
            .error_for_status()
            .context("feed http status")?
            .text()
            .await
            .context("feed http .text()")?;
        parse_feed(&body)
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
