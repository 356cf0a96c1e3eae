//! HTTP-backed archive source

use async_trait::async_trait;
use tracing::info;

use super::{retry_bounded, ArchiveSource, ListingEntry, RetryPolicy};
use crate::config::SyncConfig;
use crate::error::SyncError;

/// Fetches the listing and archives over HTTP(S) with bounded retries.
#[derive(Clone)]
pub struct HttpArchiveSource {
    http: reqwest::Client,
    listing_url: String,
    policy: RetryPolicy,
}

impl HttpArchiveSource {
    /// Build a source from the run configuration.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let listing_url = config
            .require_listing_url()
            .map_err(|e| SyncError::Transport(e.to_string()))?
            .to_string();

        let http = reqwest::Client::builder()
            .user_agent(config.remote.user_agent.clone())
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to build HTTP client: {e}")))?;

        info!(listing_url = %listing_url, "HTTP archive source ready");

        Ok(Self {
            http,
            listing_url,
            policy: RetryPolicy::from(&config.fetch),
        })
    }

    async fn get_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let http = &self.http;
        retry_bounded(&self.policy, url, move || async move {
            let resp = http.get(url).send().await?.error_for_status()?;
            let body = resp.bytes().await?;
            Ok::<_, reqwest::Error>(body.to_vec())
        })
        .await
    }
}

#[async_trait]
impl ArchiveSource for HttpArchiveSource {
    async fn list_entries(&self) -> Result<Vec<ListingEntry>, SyncError> {
        let body = self.get_bytes(&self.listing_url).await.ok_or_else(|| {
            SyncError::Transport(format!(
                "{} unreachable after {} attempts",
                self.listing_url, self.policy.max_attempts
            ))
        })?;

        serde_json::from_slice(&body)
            .map_err(|e| SyncError::Transport(format!("listing is not a JSON entry array: {e}")))
    }

    async fn fetch_archive(&self, url: &str) -> Option<Vec<u8>> {
        self.get_bytes(url).await
    }

    fn source_name(&self) -> &str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_listing_url() {
        let config = SyncConfig::default();
        assert!(matches!(
            HttpArchiveSource::new(&config),
            Err(SyncError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_listing_is_transport_error() {
        let mut config = SyncConfig::default();
        // Port 9 (discard) on localhost refuses connections
        config.remote.listing_url = "http://127.0.0.1:9/listing".to_string();
        config.fetch.max_attempts = 2;
        config.fetch.attempt_timeout_secs = 1;

        let source = HttpArchiveSource::new(&config).unwrap();
        assert!(matches!(
            source.list_entries().await,
            Err(SyncError::Transport(_))
        ));
        assert_eq!(source.fetch_archive("http://127.0.0.1:9/a.kmz").await, None);
    }
}
