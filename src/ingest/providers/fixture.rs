// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;

use super::feed_xml::parse_feed;
use crate::ingest::types::{FeedEntry, FeedTransport};

/// In-memory transport: feed URL → canned XML document. Unknown URLs fail
/// like an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    feeds: HashMap<String, String>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, feed_url: &str, xml: &str) -> Self {
        self.feeds.insert(feed_url.to_string(), xml.to_string());
        self
    }
}

#[async_trait]
impl FeedTransport for FixtureTransport {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<FeedEntry>> {
        let xml = self
            .feeds
            .get(feed_url)
            .ok_or_else(|| anyhow!("no fixture for {feed_url}"))?;
        parse_feed(xml)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
