use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{NewReservation, Reservation, ReservationStatus, Role, User, Vehicle};

const RESERVATION_COLUMNS: &str = "id, vehicle_id, user_id, start_time, end_time, \
     pickup_location, return_location, status, notes, created_at";

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_reservation_row(row: &rusqlite::Row) -> rusqlite::Result<Reservation> {
    let start_str: String = row.get(3)?;
    let end_str: String = row.get(4)?;
    let status_str: String = row.get(7)?;
    let created_str: String = row.get(9)?;

    Ok(Reservation {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        user_id: row.get(2)?,
        start_time: parse_dt(&start_str),
        end_time: parse_dt(&end_str),
        pickup_location: row.get(5)?,
        return_location: row.get(6)?,
        status: ReservationStatus::parse(&status_str),
        notes: row.get(8)?,
        created_at: parse_dt(&created_str),
    })
}

// ── Reservations ──

pub fn list_reservations(conn: &Connection) -> rusqlite::Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY start_time ASC, id ASC",
    ))?;
    let rows = stmt.query_map([], parse_reservation_row)?;
    rows.collect()
}

pub fn get_reservation_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Reservation>> {
    let result = conn.query_row(
        &format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1"),
        params![id],
        parse_reservation_row,
    );

    match result {
        Ok(reservation) => Ok(Some(reservation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn list_reservations_for_vehicle(
    conn: &Connection,
    vehicle_id: i64,
) -> rusqlite::Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE vehicle_id = ?1 ORDER BY start_time ASC, id ASC",
    ))?;
    let rows = stmt.query_map(params![vehicle_id], parse_reservation_row)?;
    rows.collect()
}

/// Reservations that count toward conflicts for a vehicle, in a fixed
/// (start_time, id) order so "first conflict found" is deterministic.
/// `exclude` drops one reservation id, used when validating an edit.
pub fn list_blocking_for_vehicle(
    conn: &Connection,
    vehicle_id: i64,
    exclude: Option<i64>,
) -> rusqlite::Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE vehicle_id = ?1
           AND status NOT IN ('cancelled', 'rejected')
           AND (?2 IS NULL OR id != ?2)
         ORDER BY start_time ASC, id ASC",
    ))?;
    let rows = stmt.query_map(params![vehicle_id, exclude], parse_reservation_row)?;
    rows.collect()
}

/// Earliest blocking reservation whose `[start_time, end_time)` overlaps
/// the given half-open window. Touching endpoints do not match:
/// existing.start < new.end AND new.start < existing.end.
pub fn find_blocking_conflict(
    conn: &Connection,
    vehicle_id: i64,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    exclude: Option<i64>,
) -> rusqlite::Result<Option<Reservation>> {
    let start_str = start.format("%Y-%m-%d %H:%M:%S").to_string();
    let end_str = end.format("%Y-%m-%d %H:%M:%S").to_string();

    let result = conn.query_row(
        &format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE vehicle_id = ?1
               AND status NOT IN ('cancelled', 'rejected')
               AND (?2 IS NULL OR id != ?2)
               AND start_time < ?4
               AND ?3 < end_time
             ORDER BY start_time ASC, id ASC
             LIMIT 1",
        ),
        params![vehicle_id, exclude, start_str, end_str],
        parse_reservation_row,
    );

    match result {
        Ok(reservation) => Ok(Some(reservation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn insert_reservation(
    conn: &Connection,
    input: &NewReservation,
    created_at: &NaiveDateTime,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO reservations (vehicle_id, user_id, start_time, end_time,
             pickup_location, return_location, status, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            input.vehicle_id,
            input.user_id,
            input.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            input.end_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            input.pickup_location,
            input.return_location,
            input.status.as_str(),
            input.notes,
            created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub fn update_reservation_row(
    conn: &Connection,
    id: i64,
    vehicle_id: i64,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    pickup_location: &str,
    return_location: &str,
    status: ReservationStatus,
    notes: Option<&str>,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE reservations
         SET vehicle_id = ?1, start_time = ?2, end_time = ?3,
             pickup_location = ?4, return_location = ?5, status = ?6, notes = ?7
         WHERE id = ?8",
        params![
            vehicle_id,
            start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end.format("%Y-%m-%d %H:%M:%S").to_string(),
            pickup_location,
            return_location,
            status.as_str(),
            notes,
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_reservation(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM reservations WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Vehicles ──

fn parse_vehicle_row(row: &rusqlite::Row) -> rusqlite::Result<Vehicle> {
    let created_str: String = row.get(3)?;
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        license_plate: row.get(2)?,
        created_at: parse_dt(&created_str),
    })
}

pub fn vehicle_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM vehicles WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_vehicle_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Vehicle>> {
    let result = conn.query_row(
        "SELECT id, name, license_plate, created_at FROM vehicles WHERE id = ?1",
        params![id],
        parse_vehicle_row,
    );

    match result {
        Ok(vehicle) => Ok(Some(vehicle)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn list_vehicles(conn: &Connection) -> rusqlite::Result<Vec<Vehicle>> {
    let mut stmt = conn
        .prepare("SELECT id, name, license_plate, created_at FROM vehicles ORDER BY id ASC")?;
    let rows = stmt.query_map([], parse_vehicle_row)?;
    rows.collect()
}

pub fn insert_vehicle(
    conn: &Connection,
    name: &str,
    license_plate: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO vehicles (name, license_plate) VALUES (?1, ?2)",
        params![name, license_plate],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Users ──

pub fn get_user_by_token(conn: &Connection, token: &str) -> rusqlite::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, role, api_token FROM users WHERE api_token = ?1",
        params![token],
        |row| {
            let role_str: String = row.get(2)?;
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                role: Role::parse(&role_str),
                api_token: row.get(3)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn insert_user(
    conn: &Connection,
    name: &str,
    role: Role,
    api_token: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (name, role, api_token) VALUES (?1, ?2, ?3)",
        params![name, role.as_str(), api_token],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Audit log ──

pub struct AuditEntry {
    pub id: String,
    pub actor_id: i64,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

pub fn insert_audit_entry(
    conn: &Connection,
    id: &str,
    actor_id: i64,
    action: &str,
    entity: &str,
    entity_id: &str,
    detail: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO audit_log (id, actor_id, action, entity, entity_id, detail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, actor_id, action, entity, entity_id, detail],
    )?;
    Ok(())
}

pub fn list_audit_entries(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, actor_id, action, entity, entity_id, detail, created_at
         FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(AuditEntry {
            id: row.get(0)?,
            actor_id: row.get(1)?,
            action: row.get(2)?,
            entity: row.get(3)?,
            entity_id: row.get(4)?,
            detail: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;
    rows.collect()
}
