use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use tabdeel_ledger::items;
use tabdeel_types::api::{Claims, CreateItemRequest, ItemFilter, UpdateItemRequest};
use tabdeel_types::events::MarketEvent;
use tabdeel_types::models::Item;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let db = state.clone();
    let listings = blocking(move || items::list_active(&db.db, &filter)).await?;
    Ok(Json(listings))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let item = blocking(move || items::create_item(&db.db, claims.sub, req)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Item>, ApiError> {
    let db = state.clone();
    let item = blocking(move || items::get_item(&db.db, item_id)).await?;
    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<Item>, ApiError> {
    let db = state.clone();
    let item = blocking(move || items::update_item(&db.db, item_id, claims.sub, req)).await?;
    Ok(Json(item))
}

/// The owner's "swap completed" action from the edit dialog.
pub async fn exchange_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Item>, ApiError> {
    let db = state.clone();
    let item = blocking(move || items::mark_exchanged(&db.db, item_id, claims.sub)).await?;

    state.notifier.publish(MarketEvent::ItemStatusChanged {
        id: item.id,
        owner_id: item.owner_id,
        status: item.status,
    });
    Ok(Json(item))
}

/// Withdraws the listing. The row stays behind with status `removed`.
pub async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Item>, ApiError> {
    let db = state.clone();
    let item = blocking(move || items::remove_item(&db.db, item_id, claims.sub)).await?;

    state.notifier.publish(MarketEvent::ItemStatusChanged {
        id: item.id,
        owner_id: item.owner_id,
        status: item.status,
    });
    Ok(Json(item))
}

/// Everything the caller has ever listed, all lifecycle states included.
pub async fn my_items(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let db = state.clone();
    let listings = blocking(move || items::list_for_owner(&db.db, claims.sub)).await?;
    Ok(Json(listings))
}
