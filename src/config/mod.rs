// src/config/mod.rs
mod error;
pub mod news;

pub use error::ConfigError;
pub use news::{AggregatorLimits, NewsConfig, TransportConfig, TransportMode};
