//! API format handling
//!
//! Abstracts the differences between the chat-completions and
//! generative-content wire formats. Each module builds request bodies and
//! normalizes responses (or classified errors) for its protocol family.
//! Everything here is pure: no network, no state.

pub mod chat;
pub mod generative;
