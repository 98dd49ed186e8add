//! Swap Request Ledger: offers between two users over two items, with a
//! one-shot pending→accepted/declined lifecycle.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use tabdeel_db::Database;
use tabdeel_db::models::ResolveOutcome;
use tabdeel_types::api::{CreateSwapRequest, SwapDecision};
use tabdeel_types::models::{ItemStatus, SwapRequest, SwapStatus};

use crate::error::{LedgerError, Result};

pub fn create_request(
    db: &Database,
    requester_id: Uuid,
    req: CreateSwapRequest,
) -> Result<SwapRequest> {
    if req.target_item_id == req.offered_item_id {
        return Err(LedgerError::Validation(
            "target and offered item must be different".into(),
        ));
    }

    // Precondition failures on referenced items are validation errors: the
    // caller sent an offer that cannot exist, not a lookup that missed.
    let target = db
        .get_item(req.target_item_id)?
        .ok_or_else(|| LedgerError::Validation("target item does not exist".into()))?;
    let offered = db
        .get_item(req.offered_item_id)?
        .ok_or_else(|| LedgerError::Validation("offered item does not exist".into()))?;

    if target.status != ItemStatus::Active {
        return Err(LedgerError::Validation("target item is no longer active".into()));
    }
    if offered.status != ItemStatus::Active {
        return Err(LedgerError::Validation("offered item is no longer active".into()));
    }
    if offered.owner_id != requester_id {
        return Err(LedgerError::Validation("you can only offer an item you own".into()));
    }
    if target.owner_id == requester_id {
        return Err(LedgerError::Validation("cannot request a swap with yourself".into()));
    }

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let now = Utc::now();
    let request = SwapRequest {
        id: Uuid::new_v4(),
        target_item_id: target.id,
        target_owner_id: target.owner_id,
        requester_id,
        offered_item_id: offered.id,
        message,
        status: SwapStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    db.insert_swap_request(&request)?;
    Ok(request)
}

/// Everything the user sent or received. The store cannot OR across
/// `requester_id` and `target_owner_id`, so this is two queries merged and
/// de-duplicated here, newest first.
pub fn list_for_user(db: &Database, user_id: Uuid) -> Result<Vec<SwapRequest>> {
    let sent = db.list_swaps_by_requester(user_id, None)?;
    let received = db.list_swaps_by_target_owner(user_id, None)?;
    Ok(merge_unique(sent, received))
}

/// The inbox "Requests" tab: open offers awaiting this owner's decision.
pub fn list_pending_for_owner(db: &Database, owner_id: Uuid) -> Result<Vec<SwapRequest>> {
    Ok(db.list_swaps_by_target_owner(owner_id, Some(SwapStatus::Pending))?)
}

pub fn respond(
    db: &Database,
    request_id: Uuid,
    responder_id: Uuid,
    decision: SwapDecision,
) -> Result<SwapRequest> {
    let request = db
        .get_swap_request(request_id)?
        .ok_or(LedgerError::NotFound("swap request"))?;

    if request.target_owner_id != responder_id {
        return Err(LedgerError::Permission(
            "only the owner of the requested item can respond".into(),
        ));
    }
    if request.status != SwapStatus::Pending {
        return Err(LedgerError::InvalidState(format!(
            "request was already {}",
            request.status.as_str()
        )));
    }

    let new_status = match decision {
        SwapDecision::Accept => SwapStatus::Accepted,
        SwapDecision::Decline => SwapStatus::Declined,
    };

    // Accepting unlocks the conversation, so both items must still be live;
    // declining closes the door regardless of item state.
    let guards = match decision {
        SwapDecision::Accept => vec![request.target_item_id, request.offered_item_id],
        SwapDecision::Decline => Vec::new(),
    };

    match db.resolve_swap_request(request_id, new_status, &guards, Utc::now())? {
        ResolveOutcome::Resolved => db
            .get_swap_request(request_id)?
            .ok_or(LedgerError::NotFound("swap request")),
        ResolveOutcome::NotPending => Err(LedgerError::InvalidState(
            "request was already resolved".into(),
        )),
        ResolveOutcome::ItemUnavailable(item_id) => Err(LedgerError::InvalidState(format!(
            "item {item_id} is no longer active"
        ))),
    }
}

pub(crate) fn merge_unique(
    first: Vec<SwapRequest>,
    second: Vec<SwapRequest>,
) -> Vec<SwapRequest> {
    let mut seen = HashSet::new();
    let mut merged: Vec<SwapRequest> = first
        .into_iter()
        .chain(second)
        .filter(|r| seen.insert(r.id))
        .collect();
    merged.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged
}
