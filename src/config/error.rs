// src/config/error.rs
use thiserror::Error;

/// Deployment defects in the news configuration. These are the only
/// failures surfaced to callers; everything transient degrades instead.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no news sources configured")]
    NoSources,

    #[error("no relevance keywords configured")]
    NoKeywords,

    #[error("source #{index} has a blank name")]
    BlankSourceName { index: usize },

    #[error("source `{name}` has an invalid feed url `{url}`")]
    InvalidFeedUrl { name: String, url: String },

    #[error("source `{name}` is configured more than once")]
    DuplicateSource { name: String },

    #[error("`{field}` must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("duplicate threshold {0} is outside 0.0..=1.0")]
    ThresholdOutOfRange(f64),
}
