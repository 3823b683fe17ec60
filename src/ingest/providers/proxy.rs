// src/ingest/providers/proxy.rs
//! Retrieval through a CORS/conversion proxy in the style of
//! `https://api.allorigins.win/get?url=<feed>`, which wraps the upstream body
//! in a JSON envelope.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::feed_xml::parse_feed;
use crate::ingest::types::{FeedEntry, FeedTransport};

pub const DEFAULT_PROXY_ENDPOINT: &str = "https://api.allorigins.win/get";

#[derive(Debug, Deserialize)]
pub(crate) struct ProxyEnvelope {
    pub contents: Option<String>,
    #[serde(default)]
    pub status: Option<ProxyStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProxyStatus {
    pub http_code: Option<u16>,
}

/// Unwrap the envelope: a non-2xx upstream code or missing contents is a failure.
pub(crate) fn unwrap_envelope(env: ProxyEnvelope) -> Result<String> {
    if let Some(code) = env.status.as_ref().and_then(|s| s.http_code) {
        if !(200..300).contains(&code) {
            bail!("proxy reported upstream status {code}");
        }
    }
    env.contents
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| anyhow!("proxy envelope has no contents"))
}

#[derive(Clone)]
pub struct ProxyFeedTransport {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl ProxyFeedTransport {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("building http client")?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            timeout,
        })
    }
}

#[async_trait]
impl FeedTransport for ProxyFeedTransport {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<FeedEntry>> {
        let env: ProxyEnvelope = self
            .client
            .get(&self.endpoint)
            .query(&[("url", feed_url)])
            .timeout(self.timeout)
            .send()
            .await
            .context("proxy http get()")?
            .error_for_status()
            .context("proxy http status")?
            .json()
            .await
            .context("proxy envelope json")?;
        let xml = unwrap_envelope(env)?;
        parse_feed(&xml)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}
