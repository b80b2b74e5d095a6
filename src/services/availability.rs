use chrono::{NaiveDateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{NewReservation, Reservation, ReservationStatus};

const MAX_LOCATION_LEN: usize = 120;

#[derive(Debug)]
pub struct OverlapResult {
    pub conflict: bool,
    pub conflicting: Option<Reservation>,
}

#[derive(Debug)]
pub struct VehicleOccupancy {
    pub is_reserved: bool,
    pub reservation: Option<Reservation>,
}

/// Partial update; `None` fields keep their stored value. Touching
/// `vehicle_id`, `start_time` or `end_time` re-runs the conflict check
/// against the resulting interval.
#[derive(Debug, Default, Clone)]
pub struct ReservationPatch {
    pub vehicle_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub pickup_location: Option<String>,
    pub return_location: Option<String>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
}

fn validate_location(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_LOCATION_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_LOCATION_LEN} characters"
        )));
    }
    Ok(())
}

fn conflict_error(existing: &Reservation) -> AppError {
    AppError::ReservationConflict {
        reservation_id: existing.id,
        start: existing.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        end: existing.end_time.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Read-only overlap probe over the vehicle's blocking reservations.
///
/// Intervals are half-open: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`, so a reservation
/// ending exactly when another begins does not conflict. The first
/// conflict in (start_time, id) order is reported.
pub fn check_overlap(
    conn: &Connection,
    vehicle_id: i64,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    exclude: Option<i64>,
) -> Result<OverlapResult, AppError> {
    if start >= end {
        return Err(AppError::InvalidInterval);
    }

    let existing = queries::list_blocking_for_vehicle(conn, vehicle_id, exclude)?;
    for reservation in existing {
        if reservation.start_time < *end && *start < reservation.end_time {
            return Ok(OverlapResult {
                conflict: true,
                conflicting: Some(reservation),
            });
        }
    }

    Ok(OverlapResult {
        conflict: false,
        conflicting: None,
    })
}

/// Every blocking reservation overlapping the window, for callers that
/// need more than the first conflict.
pub fn list_conflicts(
    conn: &Connection,
    vehicle_id: i64,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    exclude: Option<i64>,
) -> Result<Vec<Reservation>, AppError> {
    if start >= end {
        return Err(AppError::InvalidInterval);
    }

    let existing = queries::list_blocking_for_vehicle(conn, vehicle_id, exclude)?;
    Ok(existing
        .into_iter()
        .filter(|r| r.start_time < *end && *start < r.end_time)
        .collect())
}

/// Create a booking. The conflict check and the insert run inside one
/// immediate-mode transaction on the shared connection, so two racing
/// calls for overlapping windows on the same vehicle cannot both commit:
/// the loser observes the winner's row and gets `ReservationConflict`.
pub fn reserve(conn: &mut Connection, input: &NewReservation) -> Result<Reservation, AppError> {
    if input.start_time >= input.end_time {
        return Err(AppError::InvalidInterval);
    }
    validate_location("pickup_location", &input.pickup_location)?;
    validate_location("return_location", &input.return_location)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !queries::vehicle_exists(&tx, input.vehicle_id)? {
        return Err(AppError::NotFound(format!("vehicle {}", input.vehicle_id)));
    }

    if let Some(existing) = queries::find_blocking_conflict(
        &tx,
        input.vehicle_id,
        &input.start_time,
        &input.end_time,
        None,
    )? {
        return Err(conflict_error(&existing));
    }

    let now = Utc::now().naive_utc();
    let id = queries::insert_reservation(&tx, input, &now)?;
    let created = queries::get_reservation_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

    tx.commit()?;
    Ok(created)
}

/// Apply a patch to an existing reservation. Interval or vehicle changes
/// are conflict-checked against the resulting values with the reservation
/// excluded, so an edit never conflicts with itself; pure status, note or
/// location edits skip the check.
pub fn update_reservation(
    conn: &mut Connection,
    id: i64,
    patch: &ReservationPatch,
    strict_transitions: bool,
) -> Result<Reservation, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = queries::get_reservation_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

    let vehicle_id = patch.vehicle_id.unwrap_or(existing.vehicle_id);
    let start = patch.start_time.unwrap_or(existing.start_time);
    let end = patch.end_time.unwrap_or(existing.end_time);
    if start >= end {
        return Err(AppError::InvalidInterval);
    }

    let pickup = patch
        .pickup_location
        .clone()
        .unwrap_or(existing.pickup_location);
    let ret = patch
        .return_location
        .clone()
        .unwrap_or(existing.return_location);
    validate_location("pickup_location", &pickup)?;
    validate_location("return_location", &ret)?;

    let status = patch.status.unwrap_or(existing.status);
    if strict_transitions {
        if let Some(next) = patch.status {
            if !existing.status.can_transition_to(next) {
                return Err(AppError::Validation(format!(
                    "status transition {} -> {} is not allowed",
                    existing.status.as_str(),
                    next.as_str()
                )));
            }
        }
    }

    let interval_touched =
        patch.vehicle_id.is_some() || patch.start_time.is_some() || patch.end_time.is_some();
    if interval_touched {
        if patch.vehicle_id.is_some() && !queries::vehicle_exists(&tx, vehicle_id)? {
            return Err(AppError::NotFound(format!("vehicle {vehicle_id}")));
        }
        // A non-blocking reservation can be moved freely.
        if status.is_blocking() {
            if let Some(other) =
                queries::find_blocking_conflict(&tx, vehicle_id, &start, &end, Some(id))?
            {
                return Err(conflict_error(&other));
            }
        }
    }

    let notes = patch.notes.clone().or(existing.notes);
    queries::update_reservation_row(
        &tx,
        id,
        vehicle_id,
        &start,
        &end,
        &pickup,
        &ret,
        status,
        notes.as_deref(),
    )?;
    let updated = queries::get_reservation_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

    tx.commit()?;
    Ok(updated)
}

/// Which blocking reservation, if any, contains `at`
/// (`start_time <= at < end_time`).
///
/// The overlap invariant means at most one should match; if several do,
/// a prior violation is already stored, so log it and answer with the
/// earliest-starting one rather than failing the request.
pub fn is_vehicle_currently_reserved(
    conn: &Connection,
    vehicle_id: i64,
    at: &NaiveDateTime,
) -> Result<VehicleOccupancy, AppError> {
    let blocking = queries::list_blocking_for_vehicle(conn, vehicle_id, None)?;
    let mut matching = blocking
        .into_iter()
        .filter(|r| r.start_time <= *at && *at < r.end_time);

    let reservation = matching.next();
    let extra = matching.count();
    if extra > 0 {
        tracing::warn!(
            vehicle_id,
            overlapping = extra + 1,
            "multiple blocking reservations contain the same instant"
        );
    }

    Ok(VehicleOccupancy {
        is_reserved: reservation.is_some(),
        reservation,
    })
}

/// Earliest-starting blocking reservation still relevant after `after`
/// (`end_time > after`), ties broken by smallest id. An ongoing
/// reservation qualifies.
pub fn closest_upcoming_reservation(
    conn: &Connection,
    vehicle_id: i64,
    after: &NaiveDateTime,
) -> Result<Option<Reservation>, AppError> {
    let blocking = queries::list_blocking_for_vehicle(conn, vehicle_id, None)?;
    Ok(blocking
        .into_iter()
        .filter(|r| r.end_time > *after)
        .min_by_key(|r| (r.start_time, r.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Role;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn seed(conn: &Connection) -> (i64, i64) {
        let vehicle_id = queries::insert_vehicle(conn, "Skoda Octavia", "1AB 2345").unwrap();
        let user_id = queries::insert_user(conn, "Dana", Role::Driver, "tok-dana").unwrap();
        (vehicle_id, user_id)
    }

    fn booking(vehicle_id: i64, user_id: i64, start: &str, end: &str) -> NewReservation {
        NewReservation {
            vehicle_id,
            user_id,
            start_time: dt(start),
            end_time: dt(end),
            pickup_location: "Prague".to_string(),
            return_location: "Brno".to_string(),
            status: ReservationStatus::Pending,
            notes: None,
        }
    }

    #[test]
    fn test_check_overlap_rejects_inverted_interval() {
        let conn = setup_db();
        let (vehicle_id, _) = seed(&conn);
        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 11:00"),
            &dt("2025-06-16 09:00"),
            None,
        );
        assert!(matches!(result, Err(AppError::InvalidInterval)));

        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 09:00"),
            &dt("2025-06-16 09:00"),
            None,
        );
        assert!(matches!(result, Err(AppError::InvalidInterval)));
    }

    #[test]
    fn test_check_overlap_empty_vehicle() {
        let conn = setup_db();
        let (vehicle_id, _) = seed(&conn);
        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 09:00"),
            &dt("2025-06-16 11:00"),
            None,
        )
        .unwrap();
        assert!(!result.conflict);
        assert!(result.conflicting.is_none());
    }

    #[test]
    fn test_check_overlap_detects_conflict() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let first = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 10:00"),
            &dt("2025-06-16 12:00"),
            None,
        )
        .unwrap();
        assert!(result.conflict);
        assert_eq!(result.conflicting.unwrap().id, first.id);
    }

    #[test]
    fn test_touching_intervals_do_not_conflict() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 10:00"),
        )
        .unwrap();

        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 10:00"),
            &dt("2025-06-16 11:00"),
            None,
        )
        .unwrap();
        assert!(!result.conflict);
    }

    #[test]
    fn test_exclude_prevents_self_conflict() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let existing = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let result = check_overlap(
            &conn,
            vehicle_id,
            &existing.start_time,
            &existing.end_time,
            Some(existing.id),
        )
        .unwrap();
        assert!(!result.conflict);
    }

    #[test]
    fn test_cancelled_and_rejected_never_block() {
        let conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let now = Utc::now().naive_utc();

        for status in [ReservationStatus::Cancelled, ReservationStatus::Rejected] {
            let mut input = booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00");
            input.status = status;
            queries::insert_reservation(&conn, &input, &now).unwrap();
        }

        let result = check_overlap(
            &conn,
            vehicle_id,
            &dt("2025-06-16 09:00"),
            &dt("2025-06-16 11:00"),
            None,
        )
        .unwrap();
        assert!(!result.conflict);
    }

    #[test]
    fn test_list_conflicts_returns_all() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let a = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 10:00"),
        )
        .unwrap();
        let b = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 10:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let conflicts = list_conflicts(
            &conn,
            vehicle_id,
            &dt("2025-06-16 09:30"),
            &dt("2025-06-16 10:30"),
            None,
        )
        .unwrap();
        let ids: Vec<i64> = conflicts.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_reserve_persists_and_defaults() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.pickup_location, "Prague");

        let stored = queries::get_reservation_by_id(&conn, created.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.start_time, dt("2025-06-16 09:00"));
        assert_eq!(stored.created_at, created.created_at);
    }

    #[test]
    fn test_reserve_conflict_names_existing_reservation() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let first = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let err = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 10:00", "2025-06-16 12:00"),
        )
        .unwrap_err();
        match err {
            AppError::ReservationConflict { reservation_id, .. } => {
                assert_eq!(reservation_id, first.id)
            }
            other => panic!("expected conflict, got: {other:?}"),
        }

        // touching boundary is fine
        reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 11:00", "2025-06-16 12:00"),
        )
        .unwrap();
    }

    #[test]
    fn test_reserve_unknown_vehicle() {
        let mut conn = setup_db();
        let (_, user_id) = seed(&conn);
        let err = reserve(
            &mut conn,
            &booking(999, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_reserve_validates_locations() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);

        let mut input = booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00");
        input.pickup_location = "  ".to_string();
        assert!(matches!(
            reserve(&mut conn, &input),
            Err(AppError::Validation(_))
        ));

        let mut input = booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00");
        input.return_location = "x".repeat(MAX_LOCATION_LEN + 1);
        assert!(matches!(
            reserve(&mut conn, &input),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_reschedule_checks_conflict() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let first = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();
        let second = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 12:00", "2025-06-16 14:00"),
        )
        .unwrap();

        // moving the second onto the first must fail and name the first
        let err = update_reservation(
            &mut conn,
            second.id,
            &ReservationPatch {
                start_time: Some(dt("2025-06-16 10:00")),
                end_time: Some(dt("2025-06-16 12:00")),
                ..Default::default()
            },
            false,
        )
        .unwrap_err();
        match err {
            AppError::ReservationConflict { reservation_id, .. } => {
                assert_eq!(reservation_id, first.id)
            }
            other => panic!("expected conflict, got: {other:?}"),
        }

        // moving it to a free slot succeeds
        let updated = update_reservation(
            &mut conn,
            second.id,
            &ReservationPatch {
                start_time: Some(dt("2025-06-16 15:00")),
                end_time: Some(dt("2025-06-16 16:00")),
                ..Default::default()
            },
            false,
        )
        .unwrap();
        assert_eq!(updated.start_time, dt("2025-06-16 15:00"));
    }

    #[test]
    fn test_update_keeping_own_interval_is_not_self_conflict() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let updated = update_reservation(
            &mut conn,
            created.id,
            &ReservationPatch {
                start_time: Some(dt("2025-06-16 09:30")),
                ..Default::default()
            },
            false,
        )
        .unwrap();
        assert_eq!(updated.start_time, dt("2025-06-16 09:30"));
    }

    #[test]
    fn test_update_without_interval_skips_conflict_check() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let updated = update_reservation(
            &mut conn,
            created.id,
            &ReservationPatch {
                status: Some(ReservationStatus::Confirmed),
                notes: Some("winter tyres".to_string()),
                ..Default::default()
            },
            false,
        )
        .unwrap();
        assert_eq!(updated.status, ReservationStatus::Confirmed);
        assert_eq!(updated.notes.as_deref(), Some("winter tyres"));
    }

    #[test]
    fn test_update_missing_reservation() {
        let mut conn = setup_db();
        seed(&conn);
        let err =
            update_reservation(&mut conn, 42, &ReservationPatch::default(), false).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_strict_transitions_flag() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let skip_confirm = ReservationPatch {
            status: Some(ReservationStatus::Completed),
            ..Default::default()
        };

        // lax mode accepts any defined status
        let updated = update_reservation(&mut conn, created.id, &skip_confirm, false).unwrap();
        assert_eq!(updated.status, ReservationStatus::Completed);

        // strict mode refuses to leave a terminal state
        let err = update_reservation(
            &mut conn,
            created.id,
            &ReservationPatch {
                status: Some(ReservationStatus::Pending),
                ..Default::default()
            },
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_cancelling_frees_the_slot() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        update_reservation(
            &mut conn,
            created.id,
            &ReservationPatch {
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            },
            false,
        )
        .unwrap();

        reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();
    }

    #[test]
    fn test_currently_reserved_boundaries() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let at_start =
            is_vehicle_currently_reserved(&conn, vehicle_id, &dt("2025-06-16 09:00")).unwrap();
        assert!(at_start.is_reserved);
        assert_eq!(at_start.reservation.unwrap().id, created.id);

        let inside =
            is_vehicle_currently_reserved(&conn, vehicle_id, &dt("2025-06-16 10:30")).unwrap();
        assert!(inside.is_reserved);

        // end is exclusive
        let at_end =
            is_vehicle_currently_reserved(&conn, vehicle_id, &dt("2025-06-16 11:00")).unwrap();
        assert!(!at_end.is_reserved);
        assert!(at_end.reservation.is_none());
    }

    #[test]
    fn test_currently_reserved_survives_invariant_violation() {
        let conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let now = Utc::now().naive_utc();

        // bypass the service to store the violation the check exists for
        let late = booking(vehicle_id, user_id, "2025-06-16 10:00", "2025-06-16 12:00");
        queries::insert_reservation(&conn, &late, &now).unwrap();
        let early = booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00");
        let early_id = queries::insert_reservation(&conn, &early, &now).unwrap();

        let occupancy =
            is_vehicle_currently_reserved(&conn, vehicle_id, &dt("2025-06-16 10:30")).unwrap();
        assert!(occupancy.is_reserved);
        assert_eq!(occupancy.reservation.unwrap().id, early_id);
    }

    #[test]
    fn test_closest_upcoming_ordering_and_ties() {
        let conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let now = Utc::now().naive_utc();

        let later = booking(vehicle_id, user_id, "2025-06-17 09:00", "2025-06-17 10:00");
        queries::insert_reservation(&conn, &later, &now).unwrap();
        let sooner = booking(vehicle_id, user_id, "2025-06-16 14:00", "2025-06-16 15:00");
        let sooner_id = queries::insert_reservation(&conn, &sooner, &now).unwrap();

        let next = closest_upcoming_reservation(&conn, vehicle_id, &dt("2025-06-16 08:00"))
            .unwrap()
            .unwrap();
        assert_eq!(next.id, sooner_id);

        // same start: smallest id wins
        let twin = booking(vehicle_id, user_id, "2025-06-16 14:00", "2025-06-16 16:00");
        queries::insert_reservation(&conn, &twin, &now).unwrap();
        let next = closest_upcoming_reservation(&conn, vehicle_id, &dt("2025-06-16 08:00"))
            .unwrap()
            .unwrap();
        assert_eq!(next.id, sooner_id);
    }

    #[test]
    fn test_closest_upcoming_includes_ongoing() {
        let mut conn = setup_db();
        let (vehicle_id, user_id) = seed(&conn);
        let created = reserve(
            &mut conn,
            &booking(vehicle_id, user_id, "2025-06-16 09:00", "2025-06-16 11:00"),
        )
        .unwrap();

        let next = closest_upcoming_reservation(&conn, vehicle_id, &dt("2025-06-16 10:00"))
            .unwrap()
            .unwrap();
        assert_eq!(next.id, created.id);

        // everything already ended
        let none = closest_upcoming_reservation(&conn, vehicle_id, &dt("2025-06-16 11:00")).unwrap();
        assert!(none.is_none());
    }
}
