use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Condition, Item, Message};

// -- JWT Claims --

/// JWT claims attached by the auth middleware. Canonical definition lives
/// here so handlers and the middleware agree on one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Profile --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub preferred_categories: Option<Vec<String>>,
}

// -- Items --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub condition: Condition,
    pub city: String,
    pub desired_keywords: String,
    #[serde(default)]
    pub desired_categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub condition: Option<Condition>,
    pub city: Option<String>,
    pub desired_keywords: Option<String>,
    pub desired_categories: Option<Vec<String>>,
}

/// Equality filters the store applies directly; `search` is matched against
/// title/description/category after the rows come back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub condition: Option<Condition>,
    pub search: Option<String>,
}

// -- Swaps --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSwapRequest {
    pub target_item_id: Uuid,
    pub offered_item_id: Uuid,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDecision {
    Accept,
    Decline,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondSwapRequest {
    pub decision: SwapDecision,
}

// -- Conversations --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Conversation list entry as the inbox renders it.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub other_user_id: Uuid,
    pub other_user_name: String,
    pub other_user_avatar_url: Option<String>,
    pub target_item_id: Uuid,
    pub offered_item_id: Uuid,
    pub last_message: Option<Message>,
    /// Shown when the thread is still empty.
    pub preview: String,
    pub last_activity: chrono::DateTime<chrono::Utc>,
}

// -- Recommendations --

#[derive(Debug, Serialize)]
pub struct RecommendedItemResponse {
    #[serde(flatten)]
    pub item: Item,
    pub match_strength: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestListingRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestListingResponse {
    pub category: String,
    pub description: String,
    pub desired_category: String,
}
