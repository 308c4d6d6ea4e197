//! SeaORM -> DomainError translation.
//!
//! Adapters convert `sea_orm::DbErr` here; `AppError` then maps the
//! `DomainError` to a status code.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// `table.column` from SQLite's "UNIQUE constraint failed: table.column".
fn extract_sqlite_table_column(msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = msg.find(MARKER)? + MARKER.len();
    msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn sqlite_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "users.username" => Some((ConflictKind::UniqueUsername, "Username already taken")),
        "users.email" => Some((ConflictKind::UniqueEmail, "Email already registered")),
        _ => None,
    }
}

/// Postgres reports the index name rather than the column.
fn postgres_conflict(msg: &str) -> Option<(ConflictKind, &'static str)> {
    if msg.contains("ux_users_username") {
        return Some((ConflictKind::UniqueUsername, "Username already taken"));
    }
    if msg.contains("ux_users_email") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` whose detail is safe to return.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    if let sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) = &e {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database unavailable");
        return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
    }

    if mentions_sqlstate(&msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");

        let known = extract_sqlite_table_column(&msg)
            .and_then(sqlite_conflict)
            .or_else(|| postgres_conflict(&msg));
        if let Some((kind, detail)) = known {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if msg.contains("timed out") || msg.contains("timeout") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
