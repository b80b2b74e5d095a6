use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth;
use crate::models::{NewReservation, Reservation, ReservationStatus};
use crate::services::availability::{self, ReservationPatch};
use crate::services::audit;
use crate::state::AppState;

fn parse_datetime(field: &str, s: &str) -> Result<NaiveDateTime, AppError> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|_| AppError::Validation(format!("invalid {field}: {s}")))
}

fn parse_status(s: &str) -> Result<ReservationStatus, AppError> {
    ReservationStatus::try_parse(s)
        .ok_or_else(|| AppError::Validation(format!("unknown reservation_status: {s}")))
}

#[derive(Serialize)]
pub struct ReservationResponse {
    id: i64,
    vehicle_id: i64,
    user_id: i64,
    start_time: String,
    end_time: String,
    pickup_location: String,
    return_location: String,
    reservation_status: String,
    notes: Option<String>,
    created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        ReservationResponse {
            id: r.id,
            vehicle_id: r.vehicle_id,
            user_id: r.user_id,
            start_time: r.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_time: r.end_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            pickup_location: r.pickup_location,
            return_location: r.return_location,
            reservation_status: r.status.as_str().to_string(),
            notes: r.notes,
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// GET /reservations
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let reservations = queries::list_reservations(&db)?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

// GET /reservations/:id
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ReservationResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let reservation = queries::get_reservation_by_id(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;
    Ok(Json(reservation.into()))
}

// POST /reservations
#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub vehicle_id: i64,
    /// Who the booking is for; defaults to the authenticated user, so a
    /// manager can book on a driver's behalf.
    pub user_id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    pub pickup_location: String,
    pub return_location: String,
    pub reservation_status: Option<String>,
    pub notes: Option<String>,
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let mut db = state.db.lock().unwrap();
    let ctx = auth::authenticate(&db, &headers)?;

    if req.vehicle_id <= 0 {
        return Err(AppError::Validation(
            "vehicle_id must be a positive id".to_string(),
        ));
    }
    let start_time = parse_datetime("start_time", &req.start_time)?;
    let end_time = parse_datetime("end_time", &req.end_time)?;
    let status = match req.reservation_status.as_deref() {
        Some(s) => parse_status(s)?,
        None => state.config.default_reservation_status,
    };

    let input = NewReservation {
        vehicle_id: req.vehicle_id,
        user_id: req.user_id.unwrap_or(ctx.user_id),
        start_time,
        end_time,
        pickup_location: req.pickup_location,
        return_location: req.return_location,
        status,
        notes: req.notes,
    };

    let created = availability::reserve(&mut db, &input)?;
    audit::record(
        &db,
        ctx.user_id,
        "reservation.create",
        "reservation",
        &created.id.to_string(),
        None,
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

// PUT /reservations/:id
#[derive(Deserialize)]
pub struct UpdateReservationRequest {
    pub vehicle_id: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pickup_location: Option<String>,
    pub return_location: Option<String>,
    pub reservation_status: Option<String>,
    pub notes: Option<String>,
}

pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let mut db = state.db.lock().unwrap();
    let ctx = auth::authenticate(&db, &headers)?;

    if let Some(vehicle_id) = req.vehicle_id {
        if vehicle_id <= 0 {
            return Err(AppError::Validation(
                "vehicle_id must be a positive id".to_string(),
            ));
        }
    }

    let patch = ReservationPatch {
        vehicle_id: req.vehicle_id,
        start_time: req
            .start_time
            .as_deref()
            .map(|s| parse_datetime("start_time", s))
            .transpose()?,
        end_time: req
            .end_time
            .as_deref()
            .map(|s| parse_datetime("end_time", s))
            .transpose()?,
        pickup_location: req.pickup_location,
        return_location: req.return_location,
        status: req
            .reservation_status
            .as_deref()
            .map(parse_status)
            .transpose()?,
        notes: req.notes,
    };

    let updated = availability::update_reservation(
        &mut db,
        id,
        &patch,
        state.config.strict_status_transitions,
    )?;
    audit::record(
        &db,
        ctx.user_id,
        "reservation.update",
        "reservation",
        &id.to_string(),
        None,
    );

    Ok(Json(updated.into()))
}

// DELETE /reservations/:id
pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    let ctx = auth::authenticate(&db, &headers)?;
    auth::require_admin(&ctx)?;

    if !queries::delete_reservation(&db, id)? {
        return Err(AppError::NotFound(format!("reservation {id}")));
    }
    audit::record(
        &db,
        ctx.user_id,
        "reservation.delete",
        "reservation",
        &id.to_string(),
        None,
    );

    Ok(Json(serde_json::json!({ "deleted": true })))
}

// GET /reservations/vehicle/:vehicle_id
pub async fn list_by_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let reservations = queries::list_reservations_for_vehicle(&db, vehicle_id)?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

// GET /reservations/vehicle/:vehicle_id/active
#[derive(Deserialize)]
pub struct ActiveQuery {
    pub at: Option<String>,
}

#[derive(Serialize)]
pub struct ActiveResponse {
    is_reserved: bool,
    reservation: Option<ReservationResponse>,
}

pub async fn vehicle_active(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(vehicle_id): Path<i64>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<ActiveResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let at = match query.at.as_deref() {
        Some(s) => parse_datetime("at", s)?,
        None => Utc::now().naive_utc(),
    };

    let occupancy = availability::is_vehicle_currently_reserved(&db, vehicle_id, &at)?;
    Ok(Json(ActiveResponse {
        is_reserved: occupancy.is_reserved,
        reservation: occupancy.reservation.map(Into::into),
    }))
}

// GET /reservations/vehicle/:vehicle_id/upcoming
#[derive(Deserialize)]
pub struct UpcomingQuery {
    pub after: Option<String>,
}

#[derive(Serialize)]
pub struct UpcomingResponse {
    reservation: Option<ReservationResponse>,
}

pub async fn vehicle_upcoming(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(vehicle_id): Path<i64>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<UpcomingResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let after = match query.after.as_deref() {
        Some(s) => parse_datetime("after", s)?,
        None => Utc::now().naive_utc(),
    };

    let reservation = availability::closest_upcoming_reservation(&db, vehicle_id, &after)?;
    Ok(Json(UpcomingResponse {
        reservation: reservation.map(Into::into),
    }))
}

// GET /reservations/vehicle/:vehicle_id/check
#[derive(Deserialize)]
pub struct CheckQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub exclude: Option<i64>,
}

#[derive(Serialize)]
pub struct CheckResponse {
    conflict: bool,
    conflicting_reservation: Option<ReservationResponse>,
}

pub async fn vehicle_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(vehicle_id): Path<i64>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let start = query
        .start
        .as_deref()
        .ok_or_else(|| AppError::Validation("missing start".to_string()))?;
    let end = query
        .end
        .as_deref()
        .ok_or_else(|| AppError::Validation("missing end".to_string()))?;
    let start = parse_datetime("start", start)?;
    let end = parse_datetime("end", end)?;

    let result = availability::check_overlap(&db, vehicle_id, &start, &end, query.exclude)?;
    Ok(Json(CheckResponse {
        conflict: result.conflict,
        conflicting_reservation: result.conflicting.map(Into::into),
    }))
}
