//! Gallery, engagement and upload operations on top of the database pool.
//!
//! Handlers stay thin: they parse the request, call one of these functions
//! and serialize the result.

pub mod engagement;
pub mod gallery;
pub mod students;
pub mod upload;

use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};

pub(crate) fn ensure_photo(conn: &Connection, photo_id: i64) -> AppResult<()> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM photos WHERE id = ?1",
        params![photo_id],
        |r| r.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(AppError::not_found("Photo"))
    }
}

pub(crate) fn ensure_user(conn: &Connection, user_id: i64) -> AppResult<()> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![user_id],
        |r| r.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(AppError::not_found("Student"))
    }
}

/// Insert a photo row directly. Tests use it to set up fixtures without
/// going through storage.
#[cfg(test)]
pub(crate) fn insert_test_photo(conn: &Connection, user_id: i64, title: &str, category: &str) -> i64 {
    conn.execute(
        "INSERT INTO photos (user_id, storage_key, url, title, category) VALUES (?1, ?2, ?3, ?2, ?4)",
        params![user_id, title, format!("/uploads/{}", title), category],
    )
    .unwrap();
    conn.last_insert_rowid()
}
