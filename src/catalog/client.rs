// HTTP client for the ComCat FDSN event service.
//
// `fetch_detail` issues `fdsnws/event/1/query?eventid=<id>&format=geojson`
// and succeeds only when ComCat returns 2xx with a JSON body. A 404 for an
// unknown id, a 5xx, a timeout or garbage all count as failures.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Default ComCat host.
pub const DEFAULT_COMCAT_URL: &str = "https://earthquake.usgs.gov";

/// Something that can look up an event's detail record by id.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the detail document for `event_id`. Errors on any lookup failure.
    async fn fetch_detail(&self, event_id: &str) -> Result<serde_json::Value>;
}

/// ComCat client over reqwest.
pub struct ComcatClient {
    client: reqwest::Client,
    base_url: String,
}

impl ComcatClient {
    /// Create a new ComCat client pointing at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("quakegate/0.1 (shakemap origin receiver)")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the event query endpoint.
    pub fn query_url(&self) -> String {
        format!("{}/fdsnws/event/1/query", self.base_url)
    }
}

#[async_trait]
impl CatalogService for ComcatClient {
    async fn fetch_detail(&self, event_id: &str) -> Result<serde_json::Value> {
        let url = self.query_url();

        debug!(event_id = event_id, "ComCat detail request");

        let response = self
            .client
            .get(&url)
            .query(&[("eventid", event_id), ("format", "geojson")])
            .send()
            .await
            .with_context(|| format!("ComCat request failed for {event_id}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("ComCat returned {status} for {event_id}");
        }

        response
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("Failed to parse ComCat detail for {event_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_trims_trailing_slash() {
        let client = ComcatClient::new("https://example.org/").unwrap();
        assert_eq!(
            client.query_url(),
            "https://example.org/fdsnws/event/1/query"
        );
    }
}
