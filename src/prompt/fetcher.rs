use super::{extract_content, FetchError, PromptRequest};
use crate::event::{EventSender, SessionEvent};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One-shot client for the chat-completion endpoint. A single `fetch()`
/// makes exactly one attempt; there is no retry or backoff.
pub struct PromptFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for PromptFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptFetcher")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl PromptFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        // Without explicit timeouts a broken endpoint hangs the fetch
        // indefinitely and the UI never recovers.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Issue one request and extract the prompt text. Does not touch any
    /// recording state; transport and parse failures are terminal for
    /// this attempt.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|_| FetchError::InvalidEndpoint(self.endpoint.clone()))?;

        let request =
            PromptRequest::new(self.endpoint.as_str(), self.api_key.as_str(), self.model.as_str());

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // No status special-casing: an error body simply fails content
        // extraction and surfaces as a parse failure with the raw body.
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        extract_content(&body)
    }

    /// Run `fetch()` on a background task and deliver the outcome as a
    /// session event, exactly once. If the event consumer is already gone
    /// the result is dropped silently.
    pub fn spawn_fetch(self: Arc<Self>, events: EventSender) {
        let fetcher = self;

        tokio::spawn(async move {
            match fetcher.fetch().await {
                Ok(text) => {
                    info!("Prompt fetched ({} chars)", text.len());
                    events.post(SessionEvent::PromptReady(text));
                }
                Err(err) => {
                    if let FetchError::Parse { ref raw } = err {
                        warn!("Unparseable chat-completion response: {}", raw);
                    }
                    warn!("Prompt fetch failed: {}", err);
                    events.post(SessionEvent::PromptFailed(err.to_string()));
                }
            }
        });
    }
}
