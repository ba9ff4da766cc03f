//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

/// HTTP client configuration
pub mod http {
    use std::time::Duration;

    /// Connection timeout for HTTP requests
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Per-call deadline - bounds worst-case latency for one provider call
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Maximum characters of an upstream error body kept for diagnostics
    pub const ERROR_EXCERPT_CHARS: usize = 500;
}

/// Generation configuration
pub mod generation {
    /// Low temperature biases providers toward deterministic structured output
    pub const TEMPERATURE: f64 = 0.2;

    /// Token ceiling for chat-completions providers
    pub const CHAT_MAX_TOKENS: usize = 4096;

    /// Token ceiling for generative-content providers (full HTML documents)
    pub const GENERATIVE_MAX_TOKENS: usize = 8192;

    /// Provider calls per request: one initial attempt plus one retry
    pub const MAX_ATTEMPTS: usize = 2;
}

/// Image generation configuration
pub mod images {
    /// Maximum images generated per website request
    pub const MAX_IMAGES: usize = 3;

    /// Image prompts longer than this are truncated before URL templating
    pub const MAX_PROMPT_CHARS: usize = 500;
}
