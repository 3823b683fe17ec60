// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod dates;
pub mod ingest;
pub mod metrics;
pub mod relevance;
pub mod render;
pub mod similarity;

pub use crate::aggregator::{AggregationResult, Article, NewsAggregator, NewsSnapshot};
pub use crate::api::router;
pub use crate::config::{ConfigError, NewsConfig};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing for the binaries. `RUST_LOG` wins when set. Uses
/// `try_init`, so a subscriber installed by the runtime is left alone.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news=info,ingest=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
