use serde::{Deserialize, Serialize};
use chrono::{DateTime, SecondsFormat, Utc};

pub const LANGUAGE: &str = "en";
pub const DEFAULT_TAG: &str = "ai-generated";

/// Body of `POST /api/extract`. A missing `url` is rejected by the handler,
/// not by deserialization, so it gets the same 400 as a malformed one.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub language: String,
    pub tags: Vec<String>,
    #[serde(serialize_with = "serialize_iso8601")]
    pub extracted_at: DateTime<Utc>,
}

impl ExtractResponse {
    pub fn new(title: String, url: String, summary: String, key_points: Vec<String>) -> Self {
        Self {
            title,
            url,
            summary,
            key_points,
            language: LANGUAGE.to_string(),
            tags: vec![DEFAULT_TAG.to_string()],
            extracted_at: Utc::now(),
        }
    }
}

fn serialize_iso8601<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
