use axum::{Extension, Json, extract::State};

use tabdeel_ledger::LedgerError;
use tabdeel_types::CATEGORIES;
use tabdeel_types::api::{Claims, UpdateProfileRequest};
use tabdeel_types::models::User;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    let db = state.clone();
    let user = blocking(move || {
        db.db
            .get_user(claims.sub)?
            .ok_or(LedgerError::NotFound("user"))
    })
    .await?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if let Some(ref name) = req.name {
        if name.trim().len() < 3 {
            return Err(LedgerError::Validation("name must be at least 3 characters".into()).into());
        }
    }
    if let Some(ref city) = req.city {
        if city.trim().is_empty() {
            return Err(LedgerError::Validation("city must not be empty".into()).into());
        }
    }
    if let Some(ref preferred) = req.preferred_categories {
        if let Some(unknown) = preferred.iter().find(|c| !CATEGORIES.contains(&c.as_str())) {
            return Err(
                LedgerError::Validation(format!("unknown category '{unknown}'")).into(),
            );
        }
    }

    let db = state.clone();
    let user = blocking(move || {
        let mut user = db
            .db
            .get_user(claims.sub)?
            .ok_or(LedgerError::NotFound("user"))?;

        if let Some(name) = req.name {
            user.name = name.trim().to_string();
        }
        if let Some(city) = req.city {
            user.city = city.trim().to_string();
        }
        if let Some(avatar_url) = req.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(preferred) = req.preferred_categories {
            user.preferred_categories = preferred;
        }

        db.db.update_user_profile(
            user.id,
            &user.name,
            &user.city,
            user.avatar_url.as_deref(),
            &user.preferred_categories,
        )?;
        Ok(user)
    })
    .await?;

    Ok(Json(user))
}
