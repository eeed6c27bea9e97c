//! Generative-model client (Google Gemini `generateContent`).
//!
//! The model receives the collected signals and answers with a JSON object
//! that is handed to the aggregator as a raw signal bundle.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::analysis::{AnalysisInput, ReputationModel};
use crate::error::ReputexError;
use crate::scoring::SignalMap;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// --- Response Structs ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to send request to Gemini")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReputexError::ModelError(format!("{} - {}", status, error_text)).into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse Gemini response")?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| ReputexError::ModelError("Gemini returned no text".to_string()).into())
    }
}

/// Prompt asking for the scores the aggregator understands.
pub fn build_prompt(input: &AnalysisInput) -> Result<String> {
    let data = serde_json::to_string_pretty(input)?;
    let token_line = match input.token.token_name.as_deref() {
        Some(name) => format!(
            "The token name is \"{}\". Refer to this token by name in your analysis.\n",
            name
        ),
        None => String::new(),
    };

    Ok(format!(
        "You're an AI that scores blockchain wallets and tokens for reputation.\n\
         Based on this data, give a trust score (0-100), a developer score (0-100), \
         a liquidity score (0-100), a risk category (low, medium or high), and short reasoning.\n\
         {token_line}\n\
         Data:\n{data}\n\n\
         Respond only with JSON:\n\
         {{\n  \"trustScore\": <number>,\n  \"developerScore\": <number>,\n  \
         \"liquidityScore\": <number>,\n  \"riskCategory\": \"<low | medium | high>\",\n  \
         \"summary\": \"<short explanation>\"\n}}\n"
    ))
}

/// Pull the JSON object out of a model reply, tolerating markdown fences.
pub fn parse_model_reply(text: &str) -> Result<SignalMap> {
    let trimmed = text.trim();
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    let candidate = match (start, end) {
        (Some(s), Some(e)) if s < e => &trimmed[s..=e],
        _ => trimmed,
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ReputexError::ModelError(format!("Expected a JSON object, got {}", other)).into()),
        Err(e) => Err(ReputexError::ModelError(format!("Unparseable model reply: {}", e)).into()),
    }
}

#[async_trait]
impl ReputationModel for GeminiClient {
    async fn assess(&self, input: &AnalysisInput) -> Result<SignalMap> {
        let prompt = build_prompt(input)?;
        debug!("Sending prompt to Gemini ({} chars)", prompt.len());

        let reply = self.generate(&prompt).await?;
        info!("Gemini replied for {} on {}", input.address, input.network);
        debug!("Gemini reply: {}", reply);

        parse_model_reply(&reply)
    }
}
