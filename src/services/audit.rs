use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;

/// Blind-insert audit write. A failed audit write must never fail the
/// request it describes, so errors are logged and swallowed here.
pub fn record(
    conn: &Connection,
    actor_id: i64,
    action: &str,
    entity: &str,
    entity_id: &str,
    detail: Option<&str>,
) {
    let id = Uuid::new_v4().to_string();
    if let Err(e) = queries::insert_audit_entry(conn, &id, actor_id, action, entity, entity_id, detail)
    {
        tracing::warn!(error = %e, action, entity, entity_id, "audit write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_record_inserts_entry() {
        let conn = db::init_db(":memory:").unwrap();
        record(&conn, 1, "reservation.create", "reservation", "7", None);

        let entries = queries::list_audit_entries(&conn, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "reservation.create");
        assert_eq!(entries[0].entity_id, "7");
    }

    #[test]
    fn test_record_swallows_failures() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute_batch("DROP TABLE audit_log;").unwrap();
        // must not panic even though the table is gone
        record(&conn, 1, "reservation.delete", "reservation", "7", None);
    }
}
