//! Webhook announcement publishing.
//!
//! Messages fan out to every configured endpoint. A failing endpoint is
//! logged and the remaining endpoints still attempted; publishing fails
//! only when no endpoint accepted the message.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Webhook publisher
pub struct Notifier {
    client: Client,
    endpoints: Vec<String>,
}

impl Notifier {
    /// Create a notifier for the given webhook endpoints
    pub fn new(endpoints: Vec<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Post `message` to every endpoint
    pub async fn publish(&self, message: &str) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(anyhow!("no webhook endpoints configured"));
        }

        let body = json!({ "content": message });
        let mut delivered = 0usize;

        for endpoint in &self.endpoints {
            match self.client.post(endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(endpoint = %endpoint, "Published announcement");
                    delivered += 1;
                }
                Ok(response) => {
                    warn!(
                        endpoint = %endpoint,
                        status = %response.status(),
                        "Endpoint rejected announcement"
                    );
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Failed to reach endpoint");
                }
            }
        }

        if delivered == 0 {
            return Err(anyhow!(
                "all {} endpoint(s) failed",
                self.endpoints.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_endpoints_fails() {
        let notifier = Notifier::new(Vec::new()).unwrap();
        assert!(notifier.publish("メッセージ").await.is_err());
    }
}
