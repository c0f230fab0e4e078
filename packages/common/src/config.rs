use serde::Deserialize;

use crate::mapper::SchemaVersion;
use crate::retry::RetryPolicy;

/// Generative-AI extraction settings.
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Model endpoint, without the key query parameter.
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    /// API key. When unset the extractor is disabled and yields `{}`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout. Default: 60.
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt. Default: 0.
    #[serde(default)]
    pub max_retries: u8,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
    /// Which AI output shape the mapper accepts. Default: auto.
    #[serde(default)]
    pub schema_version: SchemaVersion,
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        .into()
}
fn default_ai_timeout_secs() -> u64 {
    60
}
fn default_retry_base_ms() -> u64 {
    500
}
fn default_retry_max_ms() -> u64 {
    8_000
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            api_key: None,
            timeout_secs: default_ai_timeout_secs(),
            max_retries: 0,
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
            schema_version: SchemaVersion::default(),
        }
    }
}

impl AiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_base_ms, self.retry_max_ms)
    }

    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Uploaded document storage settings.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the blob store. Default: "./data/documents".
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Maximum accepted upload in bytes. Default: 10 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_data_dir() -> String {
    "./data/documents".into()
}
fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}
