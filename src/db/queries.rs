//! Database Queries
//!
//! Parameterized queries for enrollment rows. Read and upsert only;
//! rows are never deleted here.

use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Row};

use super::{models::EnrollmentRecord, DbError, DbResult};

/// Get an enrollment row by key
pub fn get_enrollment(conn: &Connection, scope: &str, account_id: &str) -> DbResult<EnrollmentRecord> {
    conn.query_row(
        r#"
        SELECT scope, account_id, secret, enabled, created_at, updated_at
        FROM enrollments
        WHERE scope = ?1 AND account_id = ?2
        "#,
        [scope, account_id],
        row_to_enrollment,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            DbError::NotFound(format!("Enrollment: {}/{}", scope, account_id))
        }
        _ => e.into(),
    })
}

/// Insert an enrollment row unless one already exists for the key
///
/// Returns true when the row was inserted, false when another row won.
pub fn insert_enrollment_if_absent(
    conn: &Connection,
    record: &EnrollmentRecord,
) -> DbResult<bool> {
    let rows = conn.execute(
        r#"
        INSERT INTO enrollments (scope, account_id, secret, enabled, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (scope, account_id) DO NOTHING
        "#,
        params![
            record.scope,
            record.account_id,
            record.secret,
            record.enabled,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )?;

    Ok(rows == 1)
}

/// Replace the stored secret for an existing row
pub fn update_secret(
    conn: &Connection,
    scope: &str,
    account_id: &str,
    secret: &str,
) -> DbResult<()> {
    let rows = conn.execute(
        r#"
        UPDATE enrollments
        SET secret = ?3, updated_at = ?4
        WHERE scope = ?1 AND account_id = ?2
        "#,
        params![scope, account_id, secret, Local::now().to_rfc3339()],
    )?;

    if rows == 0 {
        return Err(DbError::NotFound(format!(
            "Enrollment: {}/{}",
            scope, account_id
        )));
    }

    Ok(())
}

/// Set the enabled flag for an existing row
pub fn update_enabled(
    conn: &Connection,
    scope: &str,
    account_id: &str,
    enabled: bool,
) -> DbResult<()> {
    let rows = conn.execute(
        r#"
        UPDATE enrollments
        SET enabled = ?3, updated_at = ?4
        WHERE scope = ?1 AND account_id = ?2
        "#,
        params![scope, account_id, enabled, Local::now().to_rfc3339()],
    )?;

    if rows == 0 {
        return Err(DbError::NotFound(format!(
            "Enrollment: {}/{}",
            scope, account_id
        )));
    }

    Ok(())
}

fn row_to_enrollment(row: &Row) -> rusqlite::Result<EnrollmentRecord> {
    Ok(EnrollmentRecord {
        scope: row.get(0)?,
        account_id: row.get(1)?,
        secret: row.get(2)?,
        enabled: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
        updated_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn parse_datetime(s: String) -> DateTime<Local> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or_else(|_| Local::now())
}
