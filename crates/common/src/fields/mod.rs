//! Free-text to form field mapping
//!
//! Turns a message like "my department is Computer Science and email is
//! a@b.edu" into `[{id, value}]` pairs over [`schema::FIELD_SCHEMA`].
//!
//! - `GeminiMapper` asks the Gemini API and parses its JSON answer
//! - `KeywordMapper` matches field labels and ids locally; used when no API
//!   key is configured and as the fallback when the upstream call fails

pub mod schema;

use crate::config::MappingConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub use schema::{FieldSpec, FIELD_SCHEMA};

/// A single extracted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id: String,
    pub value: String,
}

/// Trait for field mapping backends
#[async_trait]
pub trait FieldMapper: Send + Sync {
    async fn map_fields(&self, message: &str) -> Result<Vec<FieldMapping>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Parse model output into mappings.
///
/// Tries the whole text as a JSON array, then the outermost `[...]` span.
/// Entries with unknown ids or without a value are dropped.
pub fn parse_mappings(text: &str) -> Vec<FieldMapping> {
    let parsed = serde_json::from_str::<Value>(text.trim())
        .ok()
        .filter(Value::is_array)
        .or_else(|| {
            let span = Regex::new(r"(?s)\[.*\]").ok()?;
            let found = span.find(text)?;
            serde_json::from_str::<Value>(found.as_str()).ok()
        });

    let Some(Value::Array(items)) = parsed else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?;
            if !schema::is_known(id) {
                return None;
            }
            let value = match item.get("value")? {
                Value::Null => return None,
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            (!value.is_empty()).then(|| FieldMapping {
                id: id.to_string(),
                value,
            })
        })
        .collect()
}

/// Build the instruction sent to the model
pub fn build_prompt(message: &str) -> String {
    let fields = serde_json::to_string_pretty(FIELD_SCHEMA).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"You are an intelligent form-filling assistant.
You are given a list of form fields (with id, label, type, and sample example).
Based on the user message, identify which fields the message refers to.
Return only a valid JSON array of objects: [{{"id": "...", "value": "..."}}].

User Message:
"{message}"

Available Fields:
{fields}

Rules:
- Always output only valid JSON (no markdown, no text outside JSON).
- Use the sample values to determine expected format.
- If the user provides multiple details, include multiple {{id, value}} pairs.
- Ignore irrelevant details.
"#
    )
}

/// Local mapper: `<label or id> is|:|=|- <value>`
pub struct KeywordMapper {
    patterns: Vec<(&'static str, Regex)>,
}

impl KeywordMapper {
    pub fn new() -> Self {
        let mut aliases: Vec<(&'static str, String)> = Vec::new();
        for spec in schema::distinct() {
            aliases.push((spec.id, spec.id.replace('_', " ")));
            aliases.push((spec.id, short_label(spec.label)));
        }
        aliases.retain(|(_, alias)| alias.len() > 2);
        aliases.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        aliases.dedup_by(|a, b| a.1 == b.1);

        let patterns = aliases
            .into_iter()
            .filter_map(|(id, alias)| {
                let pattern = format!(
                    r"(?i)\b{}\s*(?:is|:|=|-)\s*([^,;\n]+?)\s*(?:\s+and\s+|[,;\n]|$)",
                    regex_lite::escape(&alias)
                );
                Regex::new(&pattern).ok().map(|re| (id, re))
            })
            .collect();

        Self { patterns }
    }

    /// Synchronous matching, longest alias first, no overlapping spans
    pub fn extract(&self, message: &str) -> Vec<FieldMapping> {
        let mut taken: Vec<(usize, usize)> = Vec::new();
        let mut mappings: Vec<FieldMapping> = Vec::new();

        for (id, re) in &self.patterns {
            if mappings.iter().any(|m| m.id == *id) {
                continue;
            }
            let Some(caps) = re.captures(message) else {
                continue;
            };
            let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let span = (whole.start(), value.end());
            if taken.iter().any(|&(s, e)| span.0 < e && s < span.1) {
                continue;
            }

            let value = value.as_str().trim().trim_end_matches('.').trim();
            if value.is_empty() {
                continue;
            }
            taken.push(span);
            mappings.push(FieldMapping {
                id: id.to_string(),
                value: value.to_string(),
            });
        }

        // Report in message order
        let mut ordered: Vec<(usize, FieldMapping)> = mappings
            .into_iter()
            .zip(taken)
            .map(|(m, (start, _))| (start, m))
            .collect();
        ordered.sort_by_key(|(start, _)| *start);
        ordered.into_iter().map(|(_, m)| m).collect()
    }
}

impl Default for KeywordMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// "Name of the Board/ University" -> "name of the board"
fn short_label(label: &str) -> String {
    label
        .split(['(', '/', ':'])
        .next()
        .unwrap_or(label)
        .trim()
        .to_lowercase()
}

#[async_trait]
impl FieldMapper for KeywordMapper {
    async fn map_fields(&self, message: &str) -> Result<Vec<FieldMapping>> {
        Ok(self.extract(message))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Gemini `generateContent` client
pub struct GeminiMapper {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    fallback: KeywordMapper,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiMapper {
    pub fn new(config: &MappingConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.gemini_api_base.trim_end_matches('/').to_string(),
            fallback: KeywordMapper::new(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                message: format!("Gemini error {}: {}", status, body),
            });
        }

        let result: GenerateResponse = response.json().await?;

        Ok(result
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl FieldMapper for GeminiMapper {
    async fn map_fields(&self, message: &str) -> Result<Vec<FieldMapping>> {
        match self.generate(&build_prompt(message)).await {
            Ok(text) => Ok(parse_mappings(&text)),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini mapping failed, using keyword mapper");
                self.fallback.map_fields(message).await
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Gemini when a key is configured, keyword matching otherwise
pub fn from_config(config: &MappingConfig) -> Result<std::sync::Arc<dyn FieldMapper>> {
    match config.gemini_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Ok(std::sync::Arc::new(GeminiMapper::new(config, key.to_string())?)),
        None => Ok(std::sync::Arc::new(KeywordMapper::new())),
    }
}
