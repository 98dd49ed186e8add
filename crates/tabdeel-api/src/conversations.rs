use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use tabdeel_ledger::conversations;
use tabdeel_types::api::{Claims, ConversationResponse, SendMessageRequest};
use tabdeel_types::events::MarketEvent;
use tabdeel_types::models::Message;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

/// Shown in the list while a thread has no messages yet.
const EMPTY_THREAD_PREVIEW: &str = "Swap accepted! Say hello and arrange your trade.";

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let db = state.clone();
    let conversations =
        blocking(move || conversations::list_conversations(&db.db, claims.sub)).await?;

    let response = conversations
        .into_iter()
        .map(|convo| {
            let preview = convo
                .last_message
                .as_ref()
                .map(|m| m.text.clone())
                .unwrap_or_else(|| EMPTY_THREAD_PREVIEW.to_string());
            ConversationResponse {
                id: convo.id,
                other_user_id: convo.other_user.id,
                other_user_name: convo.other_user.name,
                other_user_avatar_url: convo.other_user.avatar_url,
                target_item_id: convo.swap_request.target_item_id,
                offered_item_id: convo.swap_request.offered_item_id,
                last_message: convo.last_message,
                preview,
                last_activity: convo.swap_request.updated_at,
            }
        })
        .collect();

    Ok(Json(response))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let db = state.clone();
    let messages =
        blocking(move || conversations::open_thread(&db.db, conversation_id, claims.sub)).await?;
    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let message = blocking(move || {
        conversations::send_message(&db.db, conversation_id, claims.sub, &req.text)
    })
    .await?;

    state.notifier.publish(MarketEvent::MessageCreated {
        id: message.id,
        swap_request_id: message.swap_request_id,
        sender_id: message.sender_id,
        timestamp: message.created_at,
    });

    Ok((StatusCode::CREATED, Json(message)))
}
