//! Provider adapter layer
//!
//! The `CompletionBackend` seam ("prompt in, text out, or a classified
//! error") and its production implementation over HTTP. Exactly one outbound
//! network call per invocation; retry policy belongs to the orchestrator,
//! never to the adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::ai::format::{chat, generative};
use crate::ai::providers::{AuthScheme, ProtocolFamily, ProviderConfig, ProviderId};
use crate::constants;
use crate::error::ProviderError;

/// A backend able to turn a canonical prompt into raw provider text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one provider call and normalize the result to plain text
    async fn complete(
        &self,
        config: &ProviderConfig,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, ProviderError>;
}

/// Production backend: one POST per call, routed by protocol family
pub struct HttpBackend {
    http: Client,
}

impl HttpBackend {
    /// Create the HTTP client with connect and per-call deadlines
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("StackStudio/1.0")
            .connect_timeout(constants::http::CONNECT_TIMEOUT)
            .timeout(constants::http::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build HTTP client: {}. Using default client.", e);
                Client::new()
            });
        Self { http }
    }

    /// Build a request with authentication attached per the provider's scheme
    fn build_request(&self, config: &ProviderConfig, api_key: &str) -> reqwest::RequestBuilder {
        let request = self.http.post(&config.url);

        let request = match config.auth {
            AuthScheme::Bearer => {
                request.header("authorization", format!("Bearer {api_key}"))
            }
            AuthScheme::QueryKey => request.query(&[("key", api_key)]),
        };

        request.header("content-type", "application/json")
    }

    /// Send one request and return the parsed JSON response
    async fn send(
        &self,
        config: &ProviderConfig,
        api_key: &str,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        let provider = config.id;

        let response = self
            .build_request(config, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            error!("{} API error: {} - {}", provider, status, body_text);
            return Err(ProviderError::Http {
                provider,
                status: status.as_u16(),
                body_excerpt: excerpt(&body_text),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| classify_transport_error(provider, e))
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(
        &self,
        config: &ProviderConfig,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        debug!("calling {} (model: {})", config.id, config.model);

        match config.family {
            ProtocolFamily::ChatCompletions => {
                let body = chat::build_request_body(config, prompt);
                let response = self.send(config, api_key, &body).await?;
                chat::parse_response(config.id, &response)
            }
            ProtocolFamily::GenerativeContent => {
                let body = generative::build_request_body(prompt);
                let response = self.send(config, api_key, &body).await?;
                generative::parse_response(config.id, &response)
            }
        }
    }
}

/// Classify a reqwest error: deadline expiry is its own failure kind
fn classify_transport_error(provider: ProviderId, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { provider }
    } else {
        ProviderError::Network {
            provider,
            message: err.to_string(),
        }
    }
}

/// Cap an upstream error body for inclusion in error values
fn excerpt(text: &str) -> String {
    text.chars()
        .take(constants::http::ERROR_EXCERPT_CHARS)
        .collect()
}
