//! AI provider layer
//!
//! Handles communication with AI providers (OpenRouter, Gemini, Groq, NVIDIA)
//! across two API formats, and recovers structured output from their text.

pub mod client;
pub mod credentials;
pub mod extract;
pub mod format;
pub mod providers;
