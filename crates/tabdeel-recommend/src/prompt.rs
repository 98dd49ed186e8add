//! Prompt templates for the generative model. The wording carries the whole
//! matching policy; the service itself never ranks anything.

use serde_json::json;

use tabdeel_types::CATEGORIES;
use tabdeel_types::models::{Item, User};

/// Compact JSON payload for one item; only the fields the model should
/// reason about.
fn item_payload(item: &Item) -> serde_json::Value {
    json!({
        "id": item.id,
        "title": item.title,
        "description": item.description,
        "category": item.category,
        "condition": item.condition.as_str(),
        "city": item.city,
        "desiredKeywords": item.desired_keywords,
        "desiredCategories": item.desired_categories,
    })
}

pub fn recommend_items(profile: &User, user_items: &[Item], candidates: &[Item]) -> String {
    let candidates_json =
        serde_json::Value::Array(candidates.iter().map(item_payload).collect()).to_string();
    let user_items_json =
        serde_json::Value::Array(user_items.iter().map(item_payload).collect()).to_string();
    let preferences_json = serde_json::to_string(&profile.preferred_categories)
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an expert recommendation engine for a barter marketplace.\n\
         \n\
         Your goal is to recommend items to a user. You will be given a list of all \
         available items to choose from.\n\
         Here is the list of all available items:\n\
         {candidates_json}\n\
         \n\
         You must make recommendations based on the current user's profile.\n\
         - User's City: {city}\n\
         - User's preferred categories: {preferences_json}\n\
         - User's currently listed items: {user_items_json}\n\
         \n\
         Consider the following factors when generating recommendations, in order of \
         importance:\n\
         1. Mutual Interest: prioritize items where the other user's desired items or \
         categories match what the current user has listed.\n\
         2. User Preferences: recommend items from the user's preferred categories.\n\
         3. Semantic Similarity: match candidate items to the user's own listed items \
         by description and category.\n\
         4. Location: prefer items whose city matches the user's city.\n\
         5. Condition: prefer better condition (Like New > Good > Fair).\n\
         \n\
         Respond with ONLY a JSON array; each element must be an object with an \
         \"itemId\" string and a \"matchStrength\" label naming the primary reason \
         (e.g. \"Mutual interest\", \"Good match\", \"Nearby\"). If there are very \
         few items to choose from, be lenient so the user has something to see.",
        city = profile.city,
    )
}

pub fn suggest_listing(title: &str, description: Option<&str>) -> String {
    let categories_json =
        serde_json::to_string(CATEGORIES).unwrap_or_else(|_| "[]".to_string());
    let description = description.unwrap_or("No description provided yet.");

    format!(
        "You are an expert in item categorization and copywriting for a barter \
         marketplace.\n\
         \n\
         Given the following item title and draft description, perform these tasks:\n\
         1. Suggest the single most appropriate category for the item.\n\
         2. Write a compelling, concise, two-line description for the item.\n\
         3. Suggest a plausible category of items the owner might want in exchange.\n\
         \n\
         Title: {title}\n\
         Draft description: {description}\n\
         \n\
         You MUST choose from the following categories for both the item's category \
         and the desired category:\n\
         {categories_json}\n\
         \n\
         Respond with ONLY a JSON object with the keys \"category\", \
         \"description\" and \"desiredCategory\"."
    )
}
