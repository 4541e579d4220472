use crate::parser::FeedParser;
use crate::traits::SnapshotSource;
use crate::types::{FeedSnapshot, FetchConfig, RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// HTTP client shared by the directory resolver and the feed fetches.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and return the body. `timeout` overrides the client-wide one.
    pub async fn download(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        let max_bytes = self.config.max_feed_size_mb.saturating_mul(1024 * 1024);

        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?.error_for_status()?;

        if let Some(content_length) = response.content_length() {
            if content_length as usize > max_bytes {
                return Err(RelayError::FeedTooLarge {
                    size_mb: content_length as usize / (1024 * 1024),
                });
            }
        }

        let body = response.bytes().await?;
        if body.len() > max_bytes {
            return Err(RelayError::FeedTooLarge {
                size_mb: body.len() / (1024 * 1024),
            });
        }

        Ok(body.to_vec())
    }

    /// Fetch and parse one feed. Never fails: network and parse problems are
    /// logged and reported through `FeedSnapshot::error` with no entries.
    pub async fn fetch_snapshot(&self, endpoint: &str) -> FeedSnapshot {
        match self.try_fetch_snapshot(endpoint).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error checking feed {}: {}", endpoint, e);
                FeedSnapshot::failed(endpoint, e.to_string())
            }
        }
    }

    async fn try_fetch_snapshot(&self, endpoint: &str) -> Result<FeedSnapshot> {
        debug!("Fetching feed: {}", endpoint);

        let content = self
            .download(endpoint, None)
            .await
            .map_err(|e| RelayError::FeedUnavailable {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let parsed = FeedParser::parse_feed(&content)?;
        info!(
            "Fetched feed {} ({} bytes, {} entries)",
            endpoint,
            content.len(),
            parsed.entries.len()
        );

        Ok(FeedSnapshot::new(endpoint, parsed.title, parsed.entries))
    }
}

#[async_trait]
impl SnapshotSource for Fetcher {
    async fn fetch(&self, endpoint: &str) -> FeedSnapshot {
        self.fetch_snapshot(endpoint).await
    }
}
