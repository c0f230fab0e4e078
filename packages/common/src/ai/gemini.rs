use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{AiError, FieldExtractor, empty_object, parse_object};
use crate::config::AiConfig;
use crate::retry::RetryPolicy;

const PROMPT: &str = "Extract structured data from this resume in JSON format with the following fields:
- `firstName`, `lastName`, `email`, `phone`, `linkedin`, `github`, `portfolio`, `address`, `headline`, `summary`, `country`, `city`, `postalCode`, `totalExperience`
- `skills` (as an array of objects with `name`, `proficiency`, `yearsOfExperience`)
- `workExperience` (as an array of objects with `company`, `role`, `startDate`, `endDate`, `duration`, `description`, `achievements`)
- `education` (as an array of objects with `school`, `degree`, `fieldOfStudy`, `startYear`, `endYear`)
- `projects` (as an array of objects with `name`, `description`, `startDate`, `endDate`, `technologies`, `projectUrl`)
- `languages` (as an array), `contact` (as an object with `email`, `phone`, `linkedin`, `github`, `portfolio`, `address`)

Resume text:
";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiExtractor {
    client: Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl GeminiExtractor {
    pub fn new(config: &AiConfig, api_key: &str) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            retry: config.retry_policy(),
        })
    }

    /// Run the extraction, retrying transient failures per the retry policy.
    pub async fn try_extract(&self, text: &str) -> Result<Value, AiError> {
        let prompt = format!("{PROMPT}{text}");
        let mut failures: u8 = 0;
        loop {
            match self.send(&prompt).await {
                Ok(body) => return candidate_object(&body),
                Err(e) if e.is_retryable() => {
                    failures = failures.saturating_add(1);
                    if !self.retry.should_retry(failures) {
                        return Err(e);
                    }
                    let delay = self.retry.delay(failures);
                    warn!(error = %e, attempt = failures, ?delay, "AI request failed; retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, AiError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body and parse it.
fn candidate_object(body: &str) -> Result<Value, AiError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AiError::MissingContent)?;
    parse_object(&text)
}

#[async_trait]
impl FieldExtractor for GeminiExtractor {
    async fn extract(&self, text: &str) -> Value {
        if text.trim().is_empty() {
            debug!("Empty resume text; skipping AI extraction");
            return empty_object();
        }

        match self.try_extract(text).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "AI field extraction failed");
                empty_object()
            }
        }
    }
}
