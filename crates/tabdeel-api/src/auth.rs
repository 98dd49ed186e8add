use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use tabdeel_db::Database;
use tabdeel_ledger::LedgerError;
use tabdeel_recommend::Recommender;
use tabdeel_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use tabdeel_types::models::User;

use crate::error::{ApiError, blocking};
use crate::notify::Notifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub notifier: Notifier,
    pub recommender: Arc<dyn Recommender>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(LedgerError::Validation("username must be 3-32 characters".into()).into());
    }
    if req.password.len() < 8 {
        return Err(LedgerError::Validation("password must be at least 8 characters".into()).into());
    }
    if req.name.trim().len() < 3 {
        return Err(LedgerError::Validation("name must be at least 3 characters".into()).into());
    }
    if req.city.trim().is_empty() {
        return Err(LedgerError::Validation("city is required".into()).into());
    }

    // Check if username is taken
    let db = state.clone();
    let username = req.username.clone();
    if blocking(move || Ok(db.db.auth_by_username(&username)?))
        .await?
        .is_some()
    {
        return Err(ApiError::UsernameTaken);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?
        .to_string();

    let user = User {
        id: Uuid::new_v4(),
        username: req.username,
        name: req.name.trim().to_string(),
        city: req.city.trim().to_string(),
        avatar_url: None,
        preferred_categories: vec![],
        created_at: Utc::now(),
    };

    let db = state.clone();
    let stored = user.clone();
    blocking(move || Ok(db.db.insert_user(&stored, &password_hash)?)).await?;

    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let username = req.username.clone();
    let row = blocking(move || Ok(db.db.auth_by_username(&username)?))
        .await?
        .ok_or_else(|| LedgerError::Permission("unknown username or wrong password".into()))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| LedgerError::Permission("unknown username or wrong password".into()))?;

    let user_id: Uuid = row
        .id
        .parse()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("corrupt user id: {e}")))?;

    let token = create_token(&state.jwt_secret, user_id, &row.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: row.username,
        token,
    }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("token encoding failed: {e}")))?;

    Ok(token)
}
