use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("start_time must be strictly before end_time")]
    InvalidInterval,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("vehicle already booked {start}\u{2013}{end} (reservation {reservation_id})")]
    ReservationConflict {
        reservation_id: i64,
        start: String,
        end: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        // A busy/locked store is a transient outage, not a query bug.
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return AppError::StoreUnavailable(e.to_string());
            }
        }
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInterval => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ReservationConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        };

        let body = match &self {
            AppError::ReservationConflict {
                reservation_id,
                start,
                end,
            } => serde_json::json!({
                "error": self.to_string(),
                "conflicting_reservation_id": reservation_id,
                "conflicting_start": start,
                "conflicting_end": end,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
