//! Item Registry: listings and their one-way lifecycle.

use chrono::Utc;
use uuid::Uuid;

use tabdeel_db::Database;
use tabdeel_types::CATEGORIES;
use tabdeel_types::api::{CreateItemRequest, ItemFilter, UpdateItemRequest};
use tabdeel_types::models::{Item, ItemStatus};

use crate::error::{LedgerError, Result};

pub fn create_item(db: &Database, owner_id: Uuid, req: CreateItemRequest) -> Result<Item> {
    let title = req.title.trim().to_string();
    let description = req.description.trim().to_string();
    validate_listing_fields(&title, &description, &req.category, &req.city, &req.desired_keywords)?;

    let now = Utc::now();
    let item = Item {
        id: Uuid::new_v4(),
        title,
        description,
        images: req.images,
        category: req.category,
        condition: req.condition,
        city: req.city,
        desired_keywords: req.desired_keywords.trim().to_string(),
        desired_categories: req.desired_categories,
        status: ItemStatus::Active,
        owner_id,
        created_at: now,
        updated_at: now,
    };
    db.insert_item(&item)?;
    Ok(item)
}

pub fn get_item(db: &Database, item_id: Uuid) -> Result<Item> {
    db.get_item(item_id)?.ok_or(LedgerError::NotFound("item"))
}

/// Browse active listings. Category/city/condition are pushed down as
/// store equality filters; free-text search runs over the returned rows.
pub fn list_active(db: &Database, filter: &ItemFilter) -> Result<Vec<Item>> {
    let mut items = db.list_active_items(
        filter.category.as_deref(),
        filter.city.as_deref(),
        filter.condition.map(|c| c.as_str()),
    )?;

    if let Some(needle) = filter.search.as_deref() {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() {
            items.retain(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
                    || item.category.to_lowercase().contains(&needle)
            });
        }
    }

    Ok(items)
}

pub fn list_for_owner(db: &Database, owner_id: Uuid) -> Result<Vec<Item>> {
    Ok(db.list_items_by_owner(owner_id)?)
}

pub fn update_item(
    db: &Database,
    item_id: Uuid,
    owner_id: Uuid,
    patch: UpdateItemRequest,
) -> Result<Item> {
    let mut item = get_item(db, item_id)?;
    if item.owner_id != owner_id {
        return Err(LedgerError::Permission("only the owner can edit a listing".into()));
    }
    if item.status != ItemStatus::Active {
        return Err(LedgerError::InvalidState(format!(
            "listing is {}, only active listings can be edited",
            item.status.as_str()
        )));
    }

    if let Some(title) = patch.title {
        item.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        item.description = description.trim().to_string();
    }
    if let Some(images) = patch.images {
        item.images = images;
    }
    if let Some(category) = patch.category {
        item.category = category;
    }
    if let Some(condition) = patch.condition {
        item.condition = condition;
    }
    if let Some(city) = patch.city {
        item.city = city;
    }
    if let Some(desired_keywords) = patch.desired_keywords {
        item.desired_keywords = desired_keywords.trim().to_string();
    }
    if let Some(desired_categories) = patch.desired_categories {
        item.desired_categories = desired_categories;
    }
    validate_listing_fields(
        &item.title,
        &item.description,
        &item.category,
        &item.city,
        &item.desired_keywords,
    )?;

    item.updated_at = Utc::now();
    if !db.update_item_row(&item)? {
        // Lost the race with a concurrent exchange/removal.
        return Err(LedgerError::InvalidState("listing is no longer active".into()));
    }
    Ok(item)
}

/// The owner's "swap completed" action. Terminal.
pub fn mark_exchanged(db: &Database, item_id: Uuid, owner_id: Uuid) -> Result<Item> {
    transition(db, item_id, owner_id, ItemStatus::Exchanged)
}

/// Withdraw a listing. Terminal; the row is kept, never deleted.
pub fn remove_item(db: &Database, item_id: Uuid, owner_id: Uuid) -> Result<Item> {
    transition(db, item_id, owner_id, ItemStatus::Removed)
}

fn transition(db: &Database, item_id: Uuid, owner_id: Uuid, to: ItemStatus) -> Result<Item> {
    let item = get_item(db, item_id)?;
    if item.owner_id != owner_id {
        return Err(LedgerError::Permission("only the owner can change a listing's status".into()));
    }

    let now = Utc::now();
    if !db.set_item_status(item_id, ItemStatus::Active, to, now)? {
        return Err(LedgerError::InvalidState(format!(
            "listing is {}, cannot become {}",
            item.status.as_str(),
            to.as_str()
        )));
    }

    Ok(Item {
        status: to,
        updated_at: now,
        ..item
    })
}

fn validate_listing_fields(
    title: &str,
    description: &str,
    category: &str,
    city: &str,
    desired_keywords: &str,
) -> Result<()> {
    if title.len() < 3 {
        return Err(LedgerError::Validation("title must be at least 3 characters".into()));
    }
    if description.len() < 10 {
        return Err(LedgerError::Validation("description must be at least 10 characters".into()));
    }
    if !CATEGORIES.contains(&category) {
        return Err(LedgerError::Validation(format!("unknown category '{category}'")));
    }
    if city.trim().is_empty() {
        return Err(LedgerError::Validation("city is required".into()));
    }
    if desired_keywords.trim().is_empty() {
        return Err(LedgerError::Validation("desired keywords are required".into()));
    }
    Ok(())
}
