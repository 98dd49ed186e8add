//! Recommendation oracle. Matching quality is delegated wholesale to a
//! hosted generative model; nothing in this crate ranks, scores, or indexes.
//! The service talks to the oracle through the `Recommender` capability so
//! everything above it can run against the deterministic stub.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use tabdeel_types::api::SuggestListingResponse;
use tabdeel_types::models::{Item, User};

pub use gemini::GeminiRecommender;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned malformed output: {0}")]
    Malformed(String),
}

/// One entry of the oracle's answer: an item worth showing, with the
/// model's own label for why ("Mutual interest", "Good match", "Nearby").
/// The output is an unordered set; no completeness or determinism is
/// assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: Uuid,
    pub match_strength: String,
}

#[async_trait]
pub trait Recommender: Send + Sync {
    /// Pick candidates worth recommending to `profile`, given what they
    /// already listed.
    async fn recommend_items(
        &self,
        profile: &User,
        user_items: &[Item],
        candidates: &[Item],
    ) -> Result<Vec<Recommendation>, RecommendError>;

    /// Help fill in the listing form: category, a short description, and a
    /// plausible desired-category, all from the title.
    async fn suggest_listing(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<SuggestListingResponse, RecommendError>;
}

/// Canned-answer recommender for tests and for running without an API key.
#[derive(Debug, Default)]
pub struct StaticRecommender {
    pub recommendations: Vec<Recommendation>,
    pub suggestion: Option<SuggestListingResponse>,
}

impl StaticRecommender {
    pub fn with_recommendations(recommendations: Vec<Recommendation>) -> Self {
        Self {
            recommendations,
            suggestion: None,
        }
    }
}

#[async_trait]
impl Recommender for StaticRecommender {
    async fn recommend_items(
        &self,
        _profile: &User,
        _user_items: &[Item],
        candidates: &[Item],
    ) -> Result<Vec<Recommendation>, RecommendError> {
        if candidates.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.recommendations.clone())
    }

    async fn suggest_listing(
        &self,
        _title: &str,
        _description: Option<&str>,
    ) -> Result<SuggestListingResponse, RecommendError> {
        Ok(self.suggestion.clone().unwrap_or(SuggestListingResponse {
            category: "Other".to_string(),
            description: String::new(),
            desired_category: "Other".to_string(),
        }))
    }
}
