//! Generation error taxonomy
//!
//! Structured error values for the provider adapters and the orchestrator
//! boundary. Human-readable strings live in the `Display` impls; the fields
//! stay machine-inspectable so callers and tests can match on them.

use thiserror::Error;

use crate::ai::providers::ProviderId;

/// Failure raised by a provider adapter for a single call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Upstream returned a non-success status; body kept as a capped excerpt
    #[error("{provider} returned HTTP {status}: {body_excerpt}")]
    Http {
        provider: ProviderId,
        status: u16,
        body_excerpt: String,
    },

    /// The per-call deadline expired before a response arrived
    #[error("{provider} request timed out. Please try again or switch providers.")]
    Timeout { provider: ProviderId },

    /// Transport-level failure other than a timeout
    #[error("{provider} connection failed: {message}. Please try another model or check your internet connection.")]
    Network {
        provider: ProviderId,
        message: String,
    },

    /// Upstream returned success but no usable content (no choices/candidates)
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: ProviderId },

    /// Content-policy block; retrying with the same prompt cannot succeed
    #[error("{provider} blocked the request for safety reasons. Rephrase the prompt or switch providers.")]
    SafetyBlocked { provider: ProviderId },

    /// Recitation block; same terminal semantics as a safety block
    #[error("{provider} blocked the response for recitation. Rephrase the prompt or switch providers.")]
    RecitationBlocked { provider: ProviderId },

    /// Output was cut off at the provider's token limit
    #[error("{provider} output was cut off at the token limit. Shorten the prompt or switch providers.")]
    Truncated { provider: ProviderId },
}

impl ProviderError {
    /// The provider responsible for this failure
    pub fn provider(&self) -> ProviderId {
        match self {
            ProviderError::Http { provider, .. }
            | ProviderError::Timeout { provider }
            | ProviderError::Network { provider, .. }
            | ProviderError::EmptyResponse { provider }
            | ProviderError::SafetyBlocked { provider }
            | ProviderError::RecitationBlocked { provider }
            | ProviderError::Truncated { provider } => *provider,
        }
    }

    /// Whether the orchestrator's stricter-prompt retry can help
    ///
    /// Content-policy blocks are terminal for a given prompt; everything else
    /// (transient HTTP failures, empty responses, truncation) gets the one
    /// retry the attempt budget allows.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ProviderError::SafetyBlocked { .. } | ProviderError::RecitationBlocked { .. }
        )
    }
}

/// Failure surfaced at the orchestrator boundary
///
/// This is the error half of a generation outcome. No panic or raw transport
/// error escapes the library; everything is folded into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Requested provider identifier is not in the registry
    #[error("unknown provider: {id}")]
    UnknownProvider { id: String },

    /// Provider is known but its credential is absent from the environment
    #[error("API key not found for {provider} (set {env_var})")]
    MissingCredential {
        provider: ProviderId,
        env_var: String,
    },

    /// A provider call failed and the retry budget is exhausted
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Both attempts produced text, but no valid structured result survived
    /// all repair strategies
    #[error("{provider} returned invalid JSON format. Try a different provider.")]
    InvalidJson { provider: ProviderId },
}

impl GenerationError {
    /// The provider responsible, when one was involved
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            GenerationError::UnknownProvider { .. } => None,
            GenerationError::MissingCredential { provider, .. } => Some(*provider),
            GenerationError::Provider(e) => Some(e.provider()),
            GenerationError::InvalidJson { provider } => Some(*provider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let retryable = ProviderError::Http {
            provider: ProviderId::Groq,
            status: 502,
            body_excerpt: "bad gateway".to_string(),
        };
        assert!(retryable.is_retryable());
        assert!(ProviderError::EmptyResponse {
            provider: ProviderId::Groq
        }
        .is_retryable());
        assert!(ProviderError::Truncated {
            provider: ProviderId::Gemini
        }
        .is_retryable());
        assert!(ProviderError::Timeout {
            provider: ProviderId::Nvidia
        }
        .is_retryable());

        assert!(!ProviderError::SafetyBlocked {
            provider: ProviderId::Gemini
        }
        .is_retryable());
        assert!(!ProviderError::RecitationBlocked {
            provider: ProviderId::Gemini
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_name_the_provider() {
        let err = GenerationError::InvalidJson {
            provider: ProviderId::Nvidia,
        };
        assert_eq!(
            err.to_string(),
            "NVIDIA Kimi returned invalid JSON format. Try a different provider."
        );

        let err = GenerationError::MissingCredential {
            provider: ProviderId::Groq,
            env_var: "GROQ_API_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "API key not found for Groq (set GROQ_API_KEY)");
    }

    #[test]
    fn test_provider_attribution() {
        let err = GenerationError::UnknownProvider {
            id: "foo".to_string(),
        };
        assert_eq!(err.provider(), None);

        let err: GenerationError = ProviderError::SafetyBlocked {
            provider: ProviderId::Gemini,
        }
        .into();
        assert_eq!(err.provider(), Some(ProviderId::Gemini));
    }
}
