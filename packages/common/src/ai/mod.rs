//! Structured-field extraction through a generative language model.

mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::AiConfig;

pub use gemini::GeminiExtractor;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI service returned HTTP {0}")]
    Status(u16),

    #[error("response has no candidate text")]
    MissingContent,

    #[error("candidate text is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("candidate JSON is not an object")]
    NotAnObject,
}

impl AiError {
    /// Network failures, 5xx and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

/// Turns resume text into a loosely structured JSON object.
///
/// Implementations never fail: any problem yields an empty object.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Value;
}

/// Extractor used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledExtractor;

#[async_trait]
impl FieldExtractor for DisabledExtractor {
    async fn extract(&self, _text: &str) -> Value {
        empty_object()
    }
}

/// Build the extractor described by `config`.
pub fn build_extractor(config: &AiConfig) -> Result<Arc<dyn FieldExtractor>, AiError> {
    match config.api_key() {
        Some(key) => Ok(Arc::new(GeminiExtractor::new(config, key)?)),
        None => {
            tracing::warn!("No AI API key configured; field extraction is disabled");
            Ok(Arc::new(DisabledExtractor))
        }
    }
}

pub fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` fence and a trailing ```` ``` ````.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parse fence-wrapped model output into a JSON object.
pub fn parse_object(text: &str) -> Result<Value, AiError> {
    match serde_json::from_str::<Value>(strip_code_fence(text))? {
        obj @ Value::Object(_) => Ok(obj),
        _ => Err(AiError::NotAnObject),
    }
}
