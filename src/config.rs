use std::env;

use crate::models::ReservationStatus;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Entry status for a newly created reservation when the request does
    /// not name one. The booking flows in production disagreed on this,
    /// so it is an explicit knob rather than a hardcoded value.
    pub default_reservation_status: ReservationStatus,
    /// When true, status changes must follow
    /// pending -> {confirmed, rejected, cancelled},
    /// confirmed -> {cancelled, completed}.
    pub strict_status_transitions: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "motorpool.db".to_string()),
            default_reservation_status: env::var("DEFAULT_RESERVATION_STATUS")
                .ok()
                .and_then(|v| ReservationStatus::try_parse(&v))
                .unwrap_or(ReservationStatus::Pending),
            strict_status_transitions: env::var("STRICT_STATUS_TRANSITIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
