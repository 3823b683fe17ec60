// src/ingest/providers/mod.rs
pub mod feed_xml;
pub mod fixture;
pub mod http;
pub mod proxy;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{TransportConfig, TransportMode};
use crate::ingest::types::FeedTransport;

/// Build the network transport selected in configuration.
pub fn build_transport(cfg: &TransportConfig) -> Result<Arc<dyn FeedTransport>> {
    let timeout = Duration::from_secs(cfg.timeout_secs.max(1));
    let transport: Arc<dyn FeedTransport> = match cfg.mode {
        TransportMode::Direct => Arc::new(http::HttpFeedTransport::new(&cfg.user_agent, timeout)?),
        TransportMode::Proxy => Arc::new(proxy::ProxyFeedTransport::new(
            &cfg.proxy_endpoint,
            &cfg.user_agent,
            timeout,
        )?),
    };
    Ok(transport)
}
