//! StackStudio Core - multi-provider AI website generation
//!
//! This crate provides the generation pipeline behind the StackStudio app:
//! - Multi-provider AI clients (chat-completions and generative-content APIs)
//! - Resilient structured-output extraction from free-form model text
//! - Generation orchestration with a bounded two-attempt budget
//! - Image URL generation for prompt enrichment

pub mod ai;
pub mod constants;
pub mod error;
pub mod generate;
pub mod images;

// Re-exports for convenience
pub use ai::client::{CompletionBackend, HttpBackend};
pub use ai::credentials::Credentials;
pub use ai::extract::{extract, StructuredResult};
pub use ai::providers::{
    AuthScheme, ProtocolFamily, ProviderConfig, ProviderId, ProviderRegistry, ProviderSummary,
};
pub use error::{GenerationError, ProviderError};
pub use generate::{Generation, GenerationMode, GenerationRequest, Generator};
