//! Generation orchestration
//!
//! Drives one generation request end to end: prompt construction, a provider
//! call through the adapter seam, structured-output extraction, and a single
//! stricter-prompt retry. At most two provider calls per request, strictly
//! sequential, always against the caller-chosen provider.

pub mod prompt;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::client::{CompletionBackend, HttpBackend};
use crate::ai::credentials::Credentials;
use crate::ai::extract::{self, StructuredResult};
use crate::ai::providers::{ProviderConfig, ProviderId, ProviderRegistry};
use crate::error::{GenerationError, ProviderError};

/// Generation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Single-page static site (the default)
    #[default]
    SinglePage,
    /// Frontend plus backend, schema, and setup instructions
    FullStack,
}

/// One user-initiated generation; ephemeral, never persisted
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user's website description
    pub prompt: String,
    /// Wire identifier of the caller-chosen provider
    pub provider: String,
    pub mode: GenerationMode,
    /// Pre-generated image URLs to splice into the prompt
    pub image_urls: Vec<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            provider: provider.into(),
            mode: GenerationMode::default(),
            image_urls: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self {
        self.image_urls = urls;
        self
    }
}

/// A successful generation plus the provider that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub result: StructuredResult,
    pub provider: ProviderId,
}

/// Outcome of one attempt: a provider failure or an extraction miss
enum AttemptError {
    Provider(ProviderError),
    Extraction,
}

impl From<ProviderError> for AttemptError {
    fn from(err: ProviderError) -> Self {
        AttemptError::Provider(err)
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Provider(e) => write!(f, "{e}"),
            AttemptError::Extraction => write!(f, "no valid JSON recovered"),
        }
    }
}

/// The generation orchestrator
///
/// Borrows the immutable registry and credential snapshot; owns the
/// completion backend. Stateless between requests, so one instance serves
/// concurrent callers.
pub struct Generator<'a> {
    registry: &'a ProviderRegistry,
    credentials: &'a Credentials,
    backend: Arc<dyn CompletionBackend>,
}

impl<'a> Generator<'a> {
    /// Orchestrator over the production HTTP backend
    pub fn new(registry: &'a ProviderRegistry, credentials: &'a Credentials) -> Self {
        Self::with_backend(registry, credentials, Arc::new(HttpBackend::new()))
    }

    /// Orchestrator over an explicit backend (test doubles)
    pub fn with_backend(
        registry: &'a ProviderRegistry,
        credentials: &'a Credentials,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            registry,
            credentials,
            backend,
        }
    }

    /// Generate a new website from a user prompt
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Generation, GenerationError> {
        let config = self.lookup(&request.provider)?;
        let api_key = self.credential_for(config)?;

        let built = prompt::build(request.mode, &request.prompt);
        let built = prompt::with_image_urls(&built, &request.image_urls);

        info!(
            "starting generation with {} (mode: {:?})",
            config.id, request.mode
        );
        self.run(config, api_key, &built).await
    }

    /// Apply a change request to an existing document
    ///
    /// Same pipeline as `generate`; the model returns the full updated
    /// document rather than a diff.
    pub async fn update(
        &self,
        existing_code: &str,
        request: &str,
        provider: &str,
    ) -> Result<Generation, GenerationError> {
        let config = self.lookup(provider)?;
        let api_key = self.credential_for(config)?;

        let built = prompt::update(existing_code, request);

        info!("starting update with {}", config.id);
        self.run(config, api_key, &built).await
    }

    fn lookup(&self, provider: &str) -> Result<&ProviderConfig, GenerationError> {
        self.registry
            .lookup_str(provider)
            .ok_or_else(|| GenerationError::UnknownProvider {
                id: provider.to_string(),
            })
    }

    fn credential_for(&self, config: &ProviderConfig) -> Result<&str, GenerationError> {
        self.credentials
            .get(&config.api_key_env)
            .ok_or_else(|| GenerationError::MissingCredential {
                provider: config.id,
                env_var: config.api_key_env.clone(),
            })
    }

    /// Run the bounded attempt loop: initial call, then one stricter retry
    ///
    /// The retry reuses the same provider and prompt with an explicit raw-JSON
    /// directive appended: escalation, not a different strategy. Content
    /// policy blocks skip the retry since an identical prompt cannot clear
    /// them.
    async fn run(
        &self,
        config: &ProviderConfig,
        api_key: &str,
        built_prompt: &str,
    ) -> Result<Generation, GenerationError> {
        let first_err = match self.attempt(config, api_key, built_prompt).await {
            Ok(result) => {
                return Ok(Generation {
                    result,
                    provider: config.id,
                })
            }
            Err(AttemptError::Provider(e)) if !e.is_retryable() => {
                warn!("{} rejected the prompt ({}), not retrying", config.id, e);
                return Err(e.into());
            }
            Err(e) => e,
        };

        warn!(
            "attempt 1 with {} failed ({}), retrying with stricter prompt",
            config.id, first_err
        );

        let stricter = format!("{built_prompt}{}", prompt::STRICT_JSON_SUFFIX);
        match self.attempt(config, api_key, &stricter).await {
            Ok(result) => Ok(Generation {
                result,
                provider: config.id,
            }),
            Err(AttemptError::Provider(e)) => Err(e.into()),
            Err(AttemptError::Extraction) => Err(GenerationError::InvalidJson {
                provider: config.id,
            }),
        }
    }

    /// One provider call followed by one extraction pass
    async fn attempt(
        &self,
        config: &ProviderConfig,
        api_key: &str,
        built_prompt: &str,
    ) -> Result<StructuredResult, AttemptError> {
        let raw = self.backend.complete(config, api_key, built_prompt).await?;
        extract::extract(&raw).ok_or(AttemptError::Extraction)
    }
}
