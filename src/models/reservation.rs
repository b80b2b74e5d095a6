use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub vehicle_id: i64,
    pub user_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub pickup_location: String,
    pub return_location: String,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Validated input for a new booking; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub vehicle_id: i64,
    pub user_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub pickup_location: String,
    pub return_location: String,
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Rejected => "rejected",
        }
    }

    /// Lenient parse used when reading rows back from the store.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or(ReservationStatus::Pending)
    }

    /// Strict parse used at the input boundary; unknown values are rejected.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            "rejected" => Some(ReservationStatus::Rejected),
            _ => None,
        }
    }

    /// Cancelled and rejected reservations never count toward conflicts.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Rejected
        )
    }

    /// Transitions permitted when strict status checking is enabled.
    /// Terminal states admit no further transitions.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            ReservationStatus::Pending => matches!(
                next,
                ReservationStatus::Confirmed
                    | ReservationStatus::Rejected
                    | ReservationStatus::Cancelled
            ),
            ReservationStatus::Confirmed => matches!(
                next,
                ReservationStatus::Cancelled | ReservationStatus::Completed
            ),
            ReservationStatus::Cancelled
            | ReservationStatus::Completed
            | ReservationStatus::Rejected => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for s in ["pending", "confirmed", "cancelled", "completed", "rejected"] {
            assert_eq!(ReservationStatus::parse(s).as_str(), s);
        }
    }

    #[test]
    fn test_try_parse_rejects_unknown() {
        assert!(ReservationStatus::try_parse("active").is_none());
        assert!(ReservationStatus::try_parse("").is_none());
    }

    #[test]
    fn test_blocking_statuses() {
        assert!(ReservationStatus::Pending.is_blocking());
        assert!(ReservationStatus::Confirmed.is_blocking());
        assert!(ReservationStatus::Completed.is_blocking());
        assert!(!ReservationStatus::Cancelled.is_blocking());
        assert!(!ReservationStatus::Rejected.is_blocking());
    }

    #[test]
    fn test_transitions() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        // no-op transitions are always allowed
        assert!(Completed.can_transition_to(Completed));
    }
}
