use std::time::Duration;

use serde::Serialize;
use reqwest::{Client, StatusCode};
use crate::config::Config;
use crate::error::{Result, AppError};

pub const SUMMARY_PLACEHOLDER: &str = "Summary not available.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryResult {
    pub summary_text: Option<String>,
}

impl SummaryResult {
    /// The summary, or the placeholder when the provider returned nothing usable.
    pub fn text_or_placeholder(&self) -> String {
        self.summary_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(SUMMARY_PLACEHOLDER)
            .to_string()
    }

    fn from_body(body: &[u8]) -> Self {
        let json: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
        let summary_text = json[0]["summary_text"].as_str().map(str::to_string);
        Self { summary_text }
    }
}

/// Client for a hosted summarization model. Retries only while the model
/// reports 503 (still loading), with a fixed pause between attempts.
#[derive(Clone)]
pub struct SummaryClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_attempts: u32,
    backoff: Duration,
}

impl SummaryClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build summarization client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", config.inference_api_base, config.summary_model),
            api_key: config.huggingface_api_key.clone(),
            max_attempts: config.summary_max_attempts.max(1),
            backoff: config.summary_retry_backoff,
        })
    }

    pub async fn summarize(&self, text: &str) -> Result<SummaryResult> {
        let body = InferenceRequest { inputs: text };
        let mut attempt = 1;

        loop {
            let res = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| AppError::SummarizationError(format!("Request to summarization API failed: {}", e)))?;

            let status = res.status();
            if status.is_success() {
                let bytes = res
                    .bytes()
                    .await
                    .map_err(|e| AppError::SummarizationError(format!("Failed to read summarization response: {}", e)))?;
                return Ok(SummaryResult::from_body(&bytes));
            }

            if status == StatusCode::SERVICE_UNAVAILABLE && attempt < self.max_attempts {
                tracing::warn!(
                    "Summarization model unavailable (attempt {}/{}), retrying in {:?}",
                    attempt,
                    self.max_attempts,
                    self.backoff
                );
                tokio::time::sleep(self.backoff).await;
                attempt += 1;
                continue;
            }

            return Err(AppError::SummarizationError(format!(
                "Summarization API returned {} after {} attempt(s)",
                status, attempt
            )));
        }
    }
}
