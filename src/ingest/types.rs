// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One configured feed provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,     // e.g. "The Verge AI"
    pub feed_url: String, // RSS 2.0 or Atom
    pub category: String, // display label, e.g. "📱 テック"
}

impl Source {
    pub fn new(name: &str, feed_url: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            category: category.to_string(),
        }
    }
}

/// Unfiltered feed entry in canonical shape, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub raw_summary: String,
    pub link: String,
    pub published_at: String, // raw timestamp, may be empty
}

/// Entry as a transport sees it. Feeds disagree on where the snippet lives,
/// so every field stays optional until `into_raw_item`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
}

fn first_non_blank(candidates: [Option<String>; 3]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or_default()
}

impl FeedEntry {
    /// Summary precedence: `description`, then `content`, then `summary`.
    pub fn into_raw_item(self) -> RawItem {
        RawItem {
            title: self.title.unwrap_or_default(),
            raw_summary: first_non_blank([self.description, self.content, self.summary]),
            link: self.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            published_at: self
                .published
                .map(|p| p.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

/// "Fetch feed as structured items" capability. Implementations report
/// network, status and parse problems as `Err`; the fetcher degrades them.
#[async_trait::async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &'static str;
}
