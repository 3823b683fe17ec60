// src/aggregator.rs
//! Fetch → filter → cap → dedup → sort → truncate, once per call.
//!
//! Nothing survives between calls: every `aggregate` starts from an empty
//! accumulator and hands back an owned `AggregationResult`. Two overlapping
//! calls therefore work on independent lists and may both hit upstream.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::config::{AggregatorLimits, ConfigError, NewsConfig};
use crate::dates::{parse_timestamp, DateFormatter};
use crate::ingest::fetcher::SourceFetcher;
use crate::ingest::providers::build_transport;
use crate::ingest::scheduler::Pacer;
use crate::ingest::types::{FeedTransport, RawItem, Source};
use crate::ingest::{ensure_metrics_described, normalize_summary, strip_markup};
use crate::relevance::KeywordSet;
use crate::similarity::dedup_by_title;

/// Finished card. `title` and `url` are never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub display_date: String,
    /// Unix seconds; `None` when the feed timestamp could not be parsed.
    pub published_at: Option<i64>,
    pub source_name: String,
    pub category: String,
}

/// Pipeline stages, traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Filtering,
    Deduplicating,
    Sorting,
    Truncating,
    Done,
}

/// Where items went during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub sources_attempted: usize,
    /// Sources that failed or returned nothing.
    pub sources_empty: usize,
    pub raw_items: usize,
    /// Missing title or link after normalization.
    pub dropped_invalid: usize,
    pub dropped_irrelevant: usize,
    pub dropped_over_cap: usize,
    pub duplicates: usize,
    pub truncated: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    /// Newest first, at most `max_articles`.
    pub articles: Vec<Article>,
    pub report: AggregationReport,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// JSON envelope handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsSnapshot {
    pub last_updated: DateTime<Utc>,
    pub total_articles: usize,
    pub sources_count: usize,
    pub articles: Vec<Article>,
}

impl NewsSnapshot {
    pub fn new(articles: Vec<Article>, sources_count: usize, last_updated: DateTime<Utc>) -> Self {
        Self {
            last_updated,
            total_articles: articles.len(),
            sources_count,
            articles,
        }
    }
}

enum Rejection {
    Invalid,
    Irrelevant,
}

fn enter(stage: Stage) {
    tracing::debug!(target: "news", ?stage, "aggregation stage");
}

pub struct NewsAggregator {
    sources: Vec<Source>,
    keywords: KeywordSet,
    limits: AggregatorLimits,
    dates: DateFormatter,
    fetcher: SourceFetcher,
}

impl NewsAggregator {
    /// Validates the configuration; this is the only place that can fail.
    pub fn new(cfg: &NewsConfig, transport: Arc<dyn FeedTransport>) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            sources: cfg.sources.clone(),
            keywords: KeywordSet::new(&cfg.keywords),
            limits: cfg.limits.clone(),
            dates: DateFormatter::new(cfg.locale),
            fetcher: SourceFetcher::new(transport, cfg.limits.per_source_fetch_limit),
        })
    }

    /// Build with the network transport named in the configuration.
    pub fn from_config(cfg: &NewsConfig) -> anyhow::Result<Self> {
        let transport = build_transport(&cfg.transport)?;
        Ok(Self::new(cfg, transport)?)
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn limits(&self) -> &AggregatorLimits {
        &self.limits
    }

    pub async fn aggregate(&self) -> AggregationResult {
        self.aggregate_at(OffsetDateTime::now_utc()).await
    }

    /// One full cycle with an explicit reference time for date labels.
    pub async fn aggregate_at(&self, now: OffsetDateTime) -> AggregationResult {
        ensure_metrics_described();
        enter(Stage::Idle);

        let mut report = AggregationReport::default();
        let mut candidates: Vec<Article> = Vec::new();
        let mut pacer = Pacer::from_millis(self.limits.inter_source_delay_ms);

        for source in &self.sources {
            pacer.wait_turn().await;
            enter(Stage::Fetching);
            report.sources_attempted += 1;
            let items = self.fetcher.fetch(source).await;
            if items.is_empty() {
                report.sources_empty += 1;
                continue;
            }
            report.raw_items += items.len();

            enter(Stage::Filtering);
            let before = candidates.len();
            let total = items.len();
            for (i, raw) in items.into_iter().enumerate() {
                if candidates.len() - before >= self.limits.per_source_cap {
                    report.dropped_over_cap += total - i;
                    break;
                }
                match self.to_article(raw, source, now) {
                    Ok(a) => candidates.push(a),
                    Err(Rejection::Invalid) => report.dropped_invalid += 1,
                    Err(Rejection::Irrelevant) => report.dropped_irrelevant += 1,
                }
            }
            tracing::info!(
                target: "news",
                source = %source.name,
                accepted = candidates.len() - before,
                "source processed"
            );
        }

        enter(Stage::Deduplicating);
        let (mut unique, dups) = dedup_by_title(candidates, self.limits.duplicate_threshold, |a| {
            a.title.as_str()
        });
        report.duplicates = dups;

        enter(Stage::Sorting);
        // Stable; None < Some, so unparsable timestamps land last.
        unique.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        enter(Stage::Truncating);
        report.truncated = unique.len().saturating_sub(self.limits.max_articles);
        unique.truncate(self.limits.max_articles);

        enter(Stage::Done);
        counter!("news_items_filtered_total").increment(
            (report.dropped_invalid + report.dropped_irrelevant + report.dropped_over_cap) as u64,
        );
        counter!("news_duplicates_total").increment(report.duplicates as u64);
        counter!("news_articles_kept_total").increment(unique.len() as u64);
        gauge!("news_last_run_ts").set(now.unix_timestamp() as f64);

        tracing::info!(
            target: "news",
            kept = unique.len(),
            sources = report.sources_attempted,
            empty_sources = report.sources_empty,
            irrelevant = report.dropped_irrelevant,
            duplicates = report.duplicates,
            "aggregation finished"
        );

        AggregationResult {
            articles: unique,
            report,
        }
    }

    /// Same as `aggregate` wrapped in the client envelope.
    pub async fn snapshot(&self) -> NewsSnapshot {
        let result = self.aggregate().await;
        NewsSnapshot::new(result.articles, self.sources.len(), Utc::now())
    }

    fn to_article(
        &self,
        raw: RawItem,
        source: &Source,
        now: OffsetDateTime,
    ) -> Result<Article, Rejection> {
        let title = strip_markup(&raw.title);
        let url = raw.link.trim().to_string();
        if title.is_empty() || url.is_empty() {
            return Err(Rejection::Invalid);
        }

        // Relevance sees the whole snippet; only the stored copy is cut.
        let plain_summary = strip_markup(&raw.raw_summary);
        let Some(keyword) = self.keywords.first_match(&title, &plain_summary) else {
            tracing::debug!(target: "news", source = %source.name, %title, "no keyword match");
            return Err(Rejection::Irrelevant);
        };
        tracing::debug!(target: "news", source = %source.name, %title, keyword, "accepted");

        Ok(Article {
            summary: normalize_summary(&plain_summary, self.limits.summary_max_chars),
            display_date: self.dates.format(&raw.published_at, now),
            published_at: parse_timestamp(&raw.published_at),
            title,
            url,
            source_name: source.name.clone(),
            category: source.category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::providers::fixture::FixtureTransport;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-16 12:00:00 UTC);

    fn item(title: &str, link: &str, date: &str, desc: &str) -> String {
        format!(
            "<item><title>{title}</title><link>{link}</link><pubDate>{date}</pubDate><description>{desc}</description></item>"
        )
    }

    fn rss(items: &[String]) -> String {
        format!(r#"<rss version="2.0"><channel>{}</channel></rss>"#, items.concat())
    }

    fn cfg(sources: &[(&str, &str)]) -> NewsConfig {
        let mut c = NewsConfig::default_seed();
        c.locale = crate::dates::Locale::En;
        c.keywords = vec!["AI".into()];
        c.limits.inter_source_delay_ms = 0;
        c.sources = sources
            .iter()
            .map(|(n, u)| Source::new(n, u, "cat"))
            .collect();
        c
    }

    #[tokio::test]
    async fn invalid_and_irrelevant_items_are_counted() {
        let xml = rss(&[
            item("AI one", "https://a.test/1", "Fri, 16 Oct 2026 10:00:00 +0000", ""),
            item("", "https://a.test/2", "Fri, 16 Oct 2026 10:00:00 +0000", "AI"),
            item("AI no link", "", "Fri, 16 Oct 2026 10:00:00 +0000", ""),
            item("Cooking", "https://a.test/4", "Fri, 16 Oct 2026 10:00:00 +0000", "pasta"),
        ]);
        let t = FixtureTransport::new().with_feed("https://a.test/rss", &xml);
        let agg = NewsAggregator::new(&cfg(&[("A", "https://a.test/rss")]), Arc::new(t)).unwrap();
        let res = agg.aggregate_at(NOW).await;
        assert_eq!(res.articles.len(), 1);
        assert_eq!(res.articles[0].display_date, "2 hours ago");
        assert_eq!(res.report.raw_items, 4);
        assert_eq!(res.report.dropped_invalid, 2);
        assert_eq!(res.report.dropped_irrelevant, 1);
    }

    #[tokio::test]
    async fn summary_is_stripped_and_cut_but_relevance_sees_all_of_it() {
        let long = format!("{} machine AI", "x".repeat(200));
        let xml = rss(&[item(
            "Weekly roundup",
            "https://a.test/1",
            "Fri, 16 Oct 2026 10:00:00 +0000",
            &format!("&lt;p&gt;{long}&lt;/p&gt;"),
        )]);
        let t = FixtureTransport::new().with_feed("https://a.test/rss", &xml);
        let mut c = cfg(&[("A", "https://a.test/rss")]);
        c.limits.summary_max_chars = 150;
        let agg = NewsAggregator::new(&c, Arc::new(t)).unwrap();
        let res = agg.aggregate_at(NOW).await;
        assert_eq!(res.articles.len(), 1);
        let s = &res.articles[0].summary;
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), 153);
        assert!(!s.contains('<'));
    }

    #[tokio::test]
    async fn unparsable_dates_sort_last() {
        let xml = rss(&[
            item("AI undated", "https://a.test/1", "someday", ""),
            item("AI older", "https://a.test/2", "Thu, 15 Oct 2026 10:00:00 +0000", ""),
            item("AI newer", "https://a.test/3", "Fri, 16 Oct 2026 10:00:00 +0000", ""),
        ]);
        let t = FixtureTransport::new().with_feed("https://a.test/rss", &xml);
        let agg = NewsAggregator::new(&cfg(&[("A", "https://a.test/rss")]), Arc::new(t)).unwrap();
        let titles: Vec<String> = agg
            .aggregate_at(NOW)
            .await
            .articles
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["AI newer", "AI older", "AI undated"]);
    }

    #[test]
    fn construction_rejects_bad_config() {
        let c = cfg(&[]);
        let err = NewsAggregator::new(&c, Arc::new(FixtureTransport::new())).err();
        assert_eq!(err, Some(ConfigError::NoSources));
    }
}
