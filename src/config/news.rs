// src/config/news.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::dates::Locale;
use crate::ingest::providers::http::DEFAULT_USER_AGENT;
use crate::ingest::providers::proxy::DEFAULT_PROXY_ENDPOINT;
use crate::ingest::types::Source;

pub const ENV_NEWS_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const ENV_NEWS_MAX_ARTICLES: &str = "NEWS_MAX_ARTICLES";
pub const ENV_NEWS_TRANSPORT: &str = "NEWS_TRANSPORT";

pub const DEFAULT_NEWS_CONFIG_TOML: &str = "config/news.toml";
pub const DEFAULT_NEWS_CONFIG_JSON: &str = "config/news.json";

fn default_fetch_limit() -> usize {
    5
}
fn default_per_source_cap() -> usize {
    3
}
fn default_max_articles() -> usize {
    6
}
fn default_summary_max_chars() -> usize {
    150
}
fn default_delay_ms() -> u64 {
    500
}
fn default_threshold() -> f64 {
    0.7
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_proxy_endpoint() -> String {
    DEFAULT_PROXY_ENDPOINT.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Pipeline knobs. The two deployed page variants differ only here
/// (5/6 vs 10/9 for fetch limit/output size).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatorLimits {
    /// Entries considered per source fetch, before filtering.
    #[serde(default = "default_fetch_limit")]
    pub per_source_fetch_limit: usize,
    /// Accepted articles per source per cycle.
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: usize,
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
    #[serde(default = "default_delay_ms")]
    pub inter_source_delay_ms: u64,
    /// Titles scoring strictly above this are duplicates.
    #[serde(default = "default_threshold")]
    pub duplicate_threshold: f64,
}

impl Default for AggregatorLimits {
    fn default() -> Self {
        Self {
            per_source_fetch_limit: default_fetch_limit(),
            per_source_cap: default_per_source_cap(),
            max_articles: default_max_articles(),
            summary_max_chars: default_summary_max_chars(),
            inter_source_delay_ms: default_delay_ms(),
            duplicate_threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Direct,
    Proxy,
}

impl std::str::FromStr for TransportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "proxy" => Ok(Self::Proxy),
            other => Err(anyhow!("unknown transport mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    #[serde(default)]
    pub mode: TransportMode,
    #[serde(default = "default_proxy_endpoint")]
    pub proxy_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            proxy_endpoint: default_proxy_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub limits: AggregatorLimits,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl NewsConfig {
    /// Built-in seed: the three AI feeds and keywords the news page shipped with.
    pub fn default_seed() -> Self {
        Self {
            keywords: [
                "AI", "人工知能", "ChatGPT", "GPT", "機械学習", "OpenAI", "Google", "Microsoft",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            locale: Locale::Ja,
            sources: vec![
                Source::new(
                    "ITmedia AI+",
                    "https://rss.itmedia.co.jp/rss/2.0/aitplus.xml",
                    "🤖 技術",
                ),
                Source::new(
                    "VentureBeat AI",
                    "https://venturebeat.com/ai/feed/",
                    "🚀 ビジネス",
                ),
                Source::new(
                    "The Verge AI",
                    "https://www.theverge.com/ai-artificial-intelligence/rss/index.xml",
                    "📱 テック",
                ),
            ],
            limits: AggregatorLimits::default(),
            transport: TransportConfig::default(),
        }
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading news config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing news config {}", path.display()))
    }

    /// Resolve the config file and apply env overrides:
    /// 1) $NEWS_CONFIG_PATH (must exist)
    /// 2) config/news.toml
    /// 3) config/news.json
    /// 4) built-in seed
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_NEWS_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("NEWS_CONFIG_PATH points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new(DEFAULT_NEWS_CONFIG_TOML).exists() {
            Self::load_from(Path::new(DEFAULT_NEWS_CONFIG_TOML))?
        } else if Path::new(DEFAULT_NEWS_CONFIG_JSON).exists() {
            Self::load_from(Path::new(DEFAULT_NEWS_CONFIG_JSON))?
        } else {
            tracing::info!(target: "news", "no news config file found, using built-in seed");
            Self::default_seed()
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(ENV_NEWS_MAX_ARTICLES) {
            self.limits.max_articles = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_NEWS_MAX_ARTICLES}={raw} is not a number"))?;
        }
        if let Ok(raw) = std::env::var(ENV_NEWS_TRANSPORT) {
            self.transport.mode = raw.parse()?;
        }
        Ok(())
    }

    /// Reject configurations that can never produce a sensible run.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::NoKeywords);
        }

        let mut seen = HashSet::new();
        for (index, s) in self.sources.iter().enumerate() {
            let name = s.name.trim();
            if name.is_empty() {
                return Err(ConfigError::BlankSourceName { index });
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateSource {
                    name: name.to_string(),
                });
            }
            let url_ok = reqwest::Url::parse(s.feed_url.trim())
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !url_ok {
                return Err(ConfigError::InvalidFeedUrl {
                    name: name.to_string(),
                    url: s.feed_url.clone(),
                });
            }
        }

        let l = &self.limits;
        for (field, v) in [
            ("per_source_fetch_limit", l.per_source_fetch_limit),
            ("per_source_cap", l.per_source_cap),
            ("max_articles", l.max_articles),
            ("summary_max_chars", l.summary_max_chars),
        ] {
            if v == 0 {
                return Err(ConfigError::ZeroLimit { field });
            }
        }
        if !(0.0..=1.0).contains(&l.duplicate_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(l.duplicate_threshold));
        }
        Ok(())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<NewsConfig> {
    // Try TOML first if hinted or content does not look like a JSON object.
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(v) = toml::from_str::<NewsConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<NewsConfig>(s) {
        return Ok(v);
    }
    // Re-run the most likely format to report its error.
    if try_toml {
        toml::from_str::<NewsConfig>(s).map_err(anyhow::Error::from)
    } else {
        serde_json::from_str::<NewsConfig>(s).map_err(anyhow::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
keywords = ["OpenAI", "LLM"]
locale = "en"

[[sources]]
name = "Ars Technica"
feed_url = "https://feeds.arstechnica.com/arstechnica/index"
category = "⚙️ 技術"

[limits]
per_source_fetch_limit = 10
max_articles = 9

[transport]
mode = "proxy"
"#;

    #[test]
    fn toml_fills_defaults() {
        let cfg = parse_config(TOML, "toml").unwrap();
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.limits.per_source_fetch_limit, 10);
        assert_eq!(cfg.limits.max_articles, 9);
        assert_eq!(cfg.limits.per_source_cap, 3);
        assert_eq!(cfg.limits.inter_source_delay_ms, 500);
        assert_eq!(cfg.transport.mode, TransportMode::Proxy);
        assert_eq!(cfg.transport.proxy_endpoint, DEFAULT_PROXY_ENDPOINT);
        assert_eq!(cfg.transport.timeout_secs, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn json_is_accepted_without_hint() {
        let json = r#"{"keywords":["ai"],"sources":[{"name":"A","feed_url":"https://a.test/rss","category":"c"}]}"#;
        let cfg = parse_config(json, "").unwrap();
        assert_eq!(cfg.sources[0].name, "A");
        assert_eq!(cfg.limits, AggregatorLimits::default());
        // no `locale` key: same language as the seed
        assert_eq!(cfg.locale, Locale::Ja);
        assert_eq!(cfg.locale, NewsConfig::default_seed().locale);
    }

    #[test]
    fn seed_is_valid() {
        let seed = NewsConfig::default_seed();
        assert_eq!(seed.sources.len(), 3);
        assert!(seed.validate().is_ok());
    }

    #[test]
    fn validation_catches_defects() {
        let mut cfg = NewsConfig::default_seed();
        cfg.sources.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoSources));

        let mut cfg = NewsConfig::default_seed();
        cfg.sources[1].feed_url = "ftp://nope".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidFeedUrl { .. })
        ));

        let mut cfg = NewsConfig::default_seed();
        cfg.sources[2].name = cfg.sources[0].name.to_uppercase();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateSource { .. })
        ));

        let mut cfg = NewsConfig::default_seed();
        cfg.limits.per_source_cap = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroLimit {
                field: "per_source_cap"
            })
        );

        let mut cfg = NewsConfig::default_seed();
        cfg.keywords = vec!["  ".into()];
        assert_eq!(cfg.validate(), Err(ConfigError::NoKeywords));

        let mut cfg = NewsConfig::default_seed();
        cfg.limits.duplicate_threshold = 1.5;
        assert_eq!(cfg.validate(), Err(ConfigError::ThresholdOutOfRange(1.5)));
    }

    #[test]
    fn transport_mode_parses_case_insensitively() {
        assert_eq!("PROXY".parse::<TransportMode>().unwrap(), TransportMode::Proxy);
        assert!("carrier-pigeon".parse::<TransportMode>().is_err());
    }
}
