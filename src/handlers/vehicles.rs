use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth;
use crate::models::{Role, Vehicle};
use crate::services::audit;
use crate::state::AppState;

#[derive(Serialize)]
pub struct VehicleResponse {
    id: i64,
    name: String,
    license_plate: String,
    created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        VehicleResponse {
            id: v.id,
            name: v.name,
            license_plate: v.license_plate,
            created_at: v.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// GET /vehicles
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let vehicles = queries::list_vehicles(&db)?;
    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

// GET /vehicles/:id
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<VehicleResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, &headers)?;

    let vehicle = queries::get_vehicle_by_id(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("vehicle {id}")))?;
    Ok(Json(vehicle.into()))
}

// POST /vehicles
#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub license_plate: String,
}

pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    let db = state.db.lock().unwrap();
    let ctx = auth::authenticate(&db, &headers)?;
    if ctx.role == Role::Driver {
        return Err(AppError::Forbidden);
    }

    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if req.license_plate.trim().is_empty() {
        return Err(AppError::Validation(
            "license_plate must not be empty".to_string(),
        ));
    }

    let id = queries::insert_vehicle(&db, req.name.trim(), req.license_plate.trim())?;
    let vehicle = queries::get_vehicle_by_id(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("vehicle {id}")))?;
    audit::record(&db, ctx.user_id, "vehicle.create", "vehicle", &id.to_string(), None);

    Ok((StatusCode::CREATED, Json(vehicle.into())))
}
