use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use tabdeel_ledger::LedgerError;
use tabdeel_recommend::RecommendError;

/// Wire-level error. Ledger errors keep their kind so clients can tell a bad
/// request (fix your input) from a stale view (refresh and retry).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("username is already taken")]
    UsernameTaken,

    #[error(transparent)]
    Oracle(#[from] RecommendError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Ledger(LedgerError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Ledger(LedgerError::Permission(_)) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            ApiError::Ledger(LedgerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Ledger(LedgerError::InvalidState(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Ledger(LedgerError::Store(e)) => {
                error!("store error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "store error".to_string())
            }
            ApiError::UsernameTaken => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Oracle(e) => {
                error!("recommendation oracle error: {e}");
                (StatusCode::BAD_GATEWAY, "recommendation oracle unavailable".to_string())
            }
            ApiError::Internal(e) => {
                error!("internal error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

/// Runs blocking rusqlite work off the async runtime, flattening the join
/// error into the API error.
pub async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, LedgerError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("blocked task failed: {e}"))
        })?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ledger_kinds_map_to_distinct_statuses() {
        let cases = [
            (LedgerError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LedgerError::Permission("x".into()), StatusCode::FORBIDDEN),
            (LedgerError::NotFound("item"), StatusCode::NOT_FOUND),
            (LedgerError::InvalidState("x".into()), StatusCode::CONFLICT),
            (
                LedgerError::Store(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
