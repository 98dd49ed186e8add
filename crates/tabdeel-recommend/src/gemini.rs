//! Gemini `generateContent` client. The model is asked for JSON-only output
//! and the reply text is parsed back into typed results.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use tabdeel_types::api::SuggestListingResponse;
use tabdeel_types::models::{Item, User};

use crate::{Recommendation, RecommendError, Recommender, prompt};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiRecommender {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiRecommender {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point at a different endpoint (test servers, regional proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(&self, prompt_text: &str) -> Result<String, RecommendError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt_text }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| RecommendError::Malformed("response held no candidates".into()))?;

        debug!(model = %self.model, bytes = text.len(), "oracle replied");
        Ok(text)
    }
}

#[async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend_items(
        &self,
        profile: &User,
        user_items: &[Item],
        candidates: &[Item],
    ) -> Result<Vec<Recommendation>, RecommendError> {
        if candidates.is_empty() {
            return Ok(vec![]);
        }
        let text = self
            .generate(&prompt::recommend_items(profile, user_items, candidates))
            .await?;
        parse_recommendations(&text)
    }

    async fn suggest_listing(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<SuggestListingResponse, RecommendError> {
        let text = self
            .generate(&prompt::suggest_listing(title, description))
            .await?;
        parse_suggestion(&text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(rename = "itemId")]
    item_id: String,
    #[serde(rename = "matchStrength")]
    match_strength: String,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    category: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "desiredCategory")]
    desired_category: String,
}

pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>, RecommendError> {
    let raw: Vec<RawRecommendation> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| RecommendError::Malformed(e.to_string()))?;

    // Entries with unparseable ids are dropped rather than failing the whole
    // answer; the model occasionally hallucinates one.
    Ok(raw
        .into_iter()
        .filter_map(|r| {
            r.item_id.parse().ok().map(|item_id| Recommendation {
                item_id,
                match_strength: r.match_strength,
            })
        })
        .collect())
}

pub fn parse_suggestion(text: &str) -> Result<SuggestListingResponse, RecommendError> {
    let raw: RawSuggestion = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| RecommendError::Malformed(e.to_string()))?;
    Ok(SuggestListingResponse {
        category: raw.category,
        description: raw.description,
        desired_category: raw.desired_category,
    })
}

/// Models sometimes wrap JSON in a ```json fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim_start().strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}
