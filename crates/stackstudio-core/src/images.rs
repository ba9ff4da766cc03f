//! Image generation
//!
//! Dual-provider image URL production for prompt enrichment: Pollinations is
//! keyless and instant (pure URL templating, no network call), Bytez is a
//! paid API with a per-image Pollinations fallback. The generation pipeline
//! treats the resulting URLs as opaque strings.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::constants;

const POLLINATIONS_BASE: &str = "https://image.pollinations.ai";
const BYTEZ_URL: &str = "https://api.bytez.com/v1/images/generations";

/// Pollinations models (free, no API key needed)
pub const POLLINATIONS_MODELS: &[&str] = &["flux", "flux-realism", "flux-anime", "flux-3d", "turbo"];
pub const DEFAULT_POLLINATIONS_MODEL: &str = "flux";

/// Bytez models (requires BYTEZ_API_KEY, paid)
pub const BYTEZ_MODELS: &[&str] = &[
    "stabilityai/stable-diffusion-xl-base-1.0",
    "openai/dall-e-2",
    "openai/dall-e-3",
    "stable-diffusion-v1-5/stable-diffusion-v1-5",
    "google/imagen-4.0-ultra-generate-001",
    "google/imagen-4.0-generate-001",
];
pub const DEFAULT_BYTEZ_MODEL: &str = "stable-diffusion-v1-5/stable-diffusion-v1-5";

/// Which image backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageProvider {
    /// Free and instant; no API calls at all
    #[default]
    Pollinations,
    /// Paid; falls back to Pollinations per image on failure
    Bytez,
}

/// Build a Pollinations image URL; instant, no network involved
pub fn pollinations_url(prompt: &str, model: &str) -> String {
    let clean: String = prompt
        .trim()
        .chars()
        .take(constants::images::MAX_PROMPT_CHARS)
        .collect();

    let mut url = Url::parse(POLLINATIONS_BASE).expect("static base URL");
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push("prompt").push(&clean);
    }
    url.query_pairs_mut()
        .append_pair("width", "1200")
        .append_pair("height", "800")
        .append_pair("model", model)
        .append_pair("nologo", "true")
        .append_pair("enhance", "true");

    url.to_string()
}

/// Generate one image through the Bytez API
pub async fn generate_bytez(
    http: &Client,
    api_key: &str,
    prompt: &str,
    model: &str,
) -> Result<String> {
    debug!("[bytez] generating with {}", model);

    let response = http
        .post(BYTEZ_URL)
        .header("authorization", format!("Bearer {api_key}"))
        .header("accept", "application/json")
        .timeout(constants::http::REQUEST_TIMEOUT)
        .json(&json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
            "response_format": "url"
        }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!("[bytez] API error: {}", status);
        return Err(anyhow!("bytez error: {status}"));
    }

    let data: Value = response.json().await?;
    data.pointer("/data/0/url")
        .and_then(|u| u.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no image generated"))
}

/// Generate up to three image URLs for a website request
///
/// Pollinations needs no key and no network; the Bytez path degrades to
/// Pollinations per image rather than failing the batch.
pub async fn generate_many(
    http: &Client,
    prompts: &[String],
    provider: ImageProvider,
    api_key: Option<&str>,
) -> Vec<String> {
    let limited = &prompts[..prompts.len().min(constants::images::MAX_IMAGES)];
    debug!(
        "generating {} images using {:?}",
        limited.len(),
        provider
    );

    match provider {
        ImageProvider::Pollinations => limited
            .iter()
            .map(|p| pollinations_url(p, DEFAULT_POLLINATIONS_MODEL))
            .collect(),
        ImageProvider::Bytez => {
            let mut urls = Vec::with_capacity(limited.len());
            for prompt in limited {
                let url = match api_key {
                    Some(key) => {
                        match generate_bytez(http, key, prompt, DEFAULT_BYTEZ_MODEL).await {
                            Ok(url) => url,
                            Err(e) => {
                                warn!("[bytez] failed ({}), using pollinations fallback", e);
                                pollinations_url(prompt, DEFAULT_POLLINATIONS_MODEL)
                            }
                        }
                    }
                    None => pollinations_url(prompt, DEFAULT_POLLINATIONS_MODEL),
                };
                urls.push(url);
            }
            urls
        }
    }
}

/// Derive image prompts from the user's website description
///
/// Only kicks in when the user explicitly asks for generated imagery;
/// otherwise the website falls back to stock photo instructions in the
/// generation prompt.
pub fn extract_requirements(user_prompt: &str) -> Vec<String> {
    let lower = user_prompt.to_lowercase();

    let wants_images = lower.contains("ai image")
        || lower.contains("ai-generated")
        || lower.contains("generate image")
        || lower.contains("custom image")
        || lower.contains("create image");

    if !wants_images {
        return Vec::new();
    }

    let prompts: &[&str] = if lower.contains("portfolio") {
        &[
            "Professional portfolio hero image, modern minimalist design",
            "Creative workspace with laptop, clean aesthetic",
        ]
    } else if lower.contains("restaurant") || lower.contains("food") {
        &[
            "Gourmet food plating, professional photography",
            "Modern restaurant interior, elegant design",
        ]
    } else if lower.contains("ecommerce") || lower.contains("shop") {
        &[
            "Product photography, clean white background",
            "Modern shopping experience, minimalist design",
        ]
    } else if lower.contains("blog") {
        &[
            "Blog header image, modern clean design",
            "Writing workspace, minimalist aesthetic",
        ]
    } else {
        &[
            "Modern website hero image, professional clean design",
            "Abstract gradient background, modern colors",
        ]
    };

    prompts.iter().map(|p| p.to_string()).collect()
}
