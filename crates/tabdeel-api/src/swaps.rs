use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use tabdeel_ledger::swaps;
use tabdeel_types::api::{Claims, CreateSwapRequest, RespondSwapRequest};
use tabdeel_types::events::MarketEvent;
use tabdeel_types::models::SwapRequest;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

pub async fn create_swap(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateSwapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let request = blocking(move || swaps::create_request(&db.db, claims.sub, req)).await?;

    state.notifier.publish(MarketEvent::SwapRequestCreated {
        id: request.id,
        requester_id: request.requester_id,
        target_owner_id: request.target_owner_id,
        target_item_id: request.target_item_id,
        offered_item_id: request.offered_item_id,
    });

    Ok((StatusCode::CREATED, Json(request)))
}

/// Sent and received, newest first.
pub async fn list_swaps(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SwapRequest>>, ApiError> {
    let db = state.clone();
    let requests = blocking(move || swaps::list_for_user(&db.db, claims.sub)).await?;
    Ok(Json(requests))
}

/// Open offers against the caller's items: the inbox "Requests" tab.
pub async fn pending_swaps(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SwapRequest>>, ApiError> {
    let db = state.clone();
    let requests = blocking(move || swaps::list_pending_for_owner(&db.db, claims.sub)).await?;
    Ok(Json(requests))
}

pub async fn respond_swap(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondSwapRequest>,
) -> Result<Json<SwapRequest>, ApiError> {
    let db = state.clone();
    let request =
        blocking(move || swaps::respond(&db.db, request_id, claims.sub, req.decision)).await?;

    state.notifier.publish(MarketEvent::SwapRequestResolved {
        id: request.id,
        status: request.status,
        requester_id: request.requester_id,
        target_owner_id: request.target_owner_id,
    });

    Ok(Json(request))
}
