//! AI provider configuration
//!
//! Defines provider types, configurations, and the built-in provider registry
//! spanning chat-completions and generative-content API endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::ai::credentials::Credentials;

/// Unique identifier for each supported provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProviderId {
    /// Default provider (DeepSeek via OpenRouter)
    #[default]
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "nvidia")]
    Nvidia,
}

impl ProviderId {
    /// Get all supported provider IDs
    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenRouter, // Default provider, always first
            ProviderId::Gemini,
            ProviderId::Groq,
            ProviderId::Nvidia,
        ]
    }

    /// The wire identifier the HTTP layer passes around (request bodies, URLs)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenRouter => "openrouter",
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
            ProviderId::Nvidia => "nvidia",
        }
    }

    /// Parse a wire identifier; unknown strings are a hard failure upstream,
    /// never a silent default
    pub fn parse(s: &str) -> Option<ProviderId> {
        match s {
            "openrouter" => Some(ProviderId::OpenRouter),
            "gemini" => Some(ProviderId::Gemini),
            "groq" => Some(ProviderId::Groq),
            "nvidia" => Some(ProviderId::Nvidia),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::OpenRouter => write!(f, "OpenRouter"),
            ProviderId::Gemini => write!(f, "Google Gemini"),
            ProviderId::Groq => write!(f, "Groq"),
            ProviderId::Nvidia => write!(f, "NVIDIA Kimi"),
        }
    }
}

/// Wire format family a provider speaks
///
/// The two families are irreducibly different protocols: different request
/// envelopes and different failure taxonomies. All protocol-specific
/// branching lives inside the adapter for the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolFamily {
    /// OpenAI-style chat completions (messages array, choices in response)
    #[default]
    ChatCompletions,
    /// Google-style generative content (content parts, candidates, finishReason)
    GenerativeContent,
}

/// How to attach the API key to requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthScheme {
    /// Use `Authorization: Bearer <key>` header (OpenAI style)
    #[default]
    Bearer,
    /// Use a `?key=<key>` query parameter (Gemini style)
    QueryKey,
}

/// Configuration for an AI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique identifier
    pub id: ProviderId,
    /// Display name
    pub name: String,
    /// Full endpoint URL
    pub url: String,
    /// Model ID to send in API requests
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Which wire format this provider speaks
    pub family: ProtocolFamily,
    /// How to send authentication
    pub auth: AuthScheme,
}

/// Summary of a usable provider, for listing to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub id: ProviderId,
    pub name: String,
    pub model: String,
}

/// Lazily initialized built-in provider configurations
static BUILTIN_PROVIDERS: LazyLock<Vec<ProviderConfig>> = LazyLock::new(|| {
    vec![
        // OpenRouter - the default provider
        ProviderConfig {
            id: ProviderId::OpenRouter,
            name: "OpenRouter".to_string(),
            url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "deepseek/deepseek-chat".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            family: ProtocolFamily::ChatCompletions,
            auth: AuthScheme::Bearer,
        },
        // Google Gemini - generative-content API, key goes in the query string
        ProviderConfig {
            id: ProviderId::Gemini,
            name: "Google Gemini".to_string(),
            url: "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent"
                .to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            family: ProtocolFamily::GenerativeContent,
            auth: AuthScheme::QueryKey,
        },
        // Groq - OpenAI-compatible endpoint
        ProviderConfig {
            id: ProviderId::Groq,
            name: "Groq".to_string(),
            url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            family: ProtocolFamily::ChatCompletions,
            auth: AuthScheme::Bearer,
        },
        // NVIDIA - Kimi K2.5 behind NVIDIA's OpenAI-compatible gateway
        ProviderConfig {
            id: ProviderId::Nvidia,
            name: "NVIDIA Kimi".to_string(),
            url: "https://integrate.api.nvidia.com/v1/chat/completions".to_string(),
            model: "moonshotai/kimi-k2.5".to_string(),
            api_key_env: "NVIDIA_API_KEY".to_string(),
            family: ProtocolFamily::ChatCompletions,
            auth: AuthScheme::Bearer,
        },
    ]
});

/// Get all built-in provider configurations (cached, no allocation)
pub fn builtin_providers() -> &'static [ProviderConfig] {
    &BUILTIN_PROVIDERS
}

/// Immutable provider registry
///
/// Constructed once at process start and passed by reference to the
/// orchestrator; tests construct one from explicit configs.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    /// Registry over the built-in provider table
    pub fn builtin() -> Self {
        Self {
            providers: BUILTIN_PROVIDERS.clone(),
        }
    }

    /// Registry over an explicit config list (test doubles, custom deployments)
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        Self { providers }
    }

    /// Look up a provider by ID
    pub fn lookup(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Look up a provider by its wire identifier (e.g. "openrouter")
    pub fn lookup_str(&self, id: &str) -> Option<&ProviderConfig> {
        ProviderId::parse(id).and_then(|id| self.lookup(id))
    }

    /// Providers whose credential is present in the snapshot
    ///
    /// A presence check only, not a liveness check: a configured key that the
    /// upstream later rejects still lists here.
    pub fn available(&self, credentials: &Credentials) -> Vec<ProviderSummary> {
        self.providers
            .iter()
            .filter(|p| credentials.contains(&p.api_key_env))
            .map(|p| ProviderSummary {
                id: p.id,
                name: p.name.clone(),
                model: p.model.clone(),
            })
            .collect()
    }

    /// Iterate over all configured providers
    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_display() {
        assert_eq!(ProviderId::OpenRouter.to_string(), "OpenRouter");
        assert_eq!(ProviderId::Gemini.to_string(), "Google Gemini");
        assert_eq!(ProviderId::Groq.to_string(), "Groq");
        assert_eq!(ProviderId::Nvidia.to_string(), "NVIDIA Kimi");
    }

    #[test]
    fn test_provider_id_roundtrip() {
        for id in ProviderId::all() {
            assert_eq!(ProviderId::parse(id.as_str()), Some(*id));
        }
        assert_eq!(ProviderId::parse("foo"), None);
        assert_eq!(ProviderId::parse("OpenRouter"), None);
    }

    #[test]
    fn test_provider_id_serde_matches_wire_identifier() {
        for id in ProviderId::all() {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            let back: ProviderId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *id);
        }
    }

    #[test]
    fn test_builtin_providers() {
        let providers = builtin_providers();
        assert_eq!(providers.len(), 4);
        assert!(providers.iter().any(|p| p.id == ProviderId::OpenRouter));
        assert!(providers.iter().any(|p| p.id == ProviderId::Gemini));
        assert!(providers.iter().any(|p| p.id == ProviderId::Groq));
        assert!(providers.iter().any(|p| p.id == ProviderId::Nvidia));
    }

    #[test]
    fn test_openrouter_config() {
        let registry = ProviderRegistry::builtin();
        let config = registry.lookup(ProviderId::OpenRouter).unwrap();
        assert_eq!(config.url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(config.model, "deepseek/deepseek-chat");
        assert_eq!(config.family, ProtocolFamily::ChatCompletions);
        assert_eq!(config.auth, AuthScheme::Bearer);
    }

    #[test]
    fn test_gemini_config() {
        let registry = ProviderRegistry::builtin();
        let config = registry.lookup(ProviderId::Gemini).unwrap();
        assert!(config.url.ends_with("gemini-2.5-flash:generateContent"));
        assert_eq!(config.family, ProtocolFamily::GenerativeContent);
        assert_eq!(config.auth, AuthScheme::QueryKey);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_lookup_str() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.lookup_str("groq").map(|c| c.id),
            Some(ProviderId::Groq)
        );
        assert!(registry.lookup_str("foo").is_none());
    }

    #[test]
    fn test_available_filters_on_credentials() {
        let registry = ProviderRegistry::builtin();

        let credentials = Credentials::from_map([
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("GROQ_API_KEY", "gsk-test"),
        ]);
        let available = registry.available(&credentials);
        let ids: Vec<ProviderId> = available.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![ProviderId::OpenRouter, ProviderId::Groq]);

        let none = registry.available(&Credentials::default());
        assert!(none.is_empty());
    }

    #[test]
    fn test_available_carries_model_for_listing() {
        let registry = ProviderRegistry::builtin();
        let credentials = Credentials::from_map([("GEMINI_API_KEY", "key")]);
        let available = registry.available(&credentials);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Google Gemini");
        assert_eq!(available[0].model, "gemini-2.5-flash");
    }
}
