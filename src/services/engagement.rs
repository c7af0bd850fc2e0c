use rusqlite::{params, Connection, TransactionBehavior};

use crate::db::models::{Comment, LikeAction, LikeOutcome, LikeStatus};
use crate::error::{AppError, AppResult};
use crate::services::{ensure_photo, ensure_user};
use crate::state::DbPool;

/// Like the photo if the user hasn't yet, otherwise take the like back.
pub fn toggle_like(pool: &DbPool, photo_id: i64, user_id: i64) -> AppResult<LikeOutcome> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    ensure_photo(&tx, photo_id)?;
    ensure_user(&tx, user_id)?;

    let removed = tx.execute(
        "DELETE FROM likes WHERE photo_id = ?1 AND user_id = ?2",
        params![photo_id, user_id],
    )?;

    let action = if removed > 0 {
        tx.execute(
            "UPDATE photos SET likes_count = MAX(likes_count - 1, 0) WHERE id = ?1",
            params![photo_id],
        )?;
        LikeAction::Unliked
    } else {
        match tx.execute(
            "INSERT INTO likes (photo_id, user_id) VALUES (?1, ?2)",
            params![photo_id, user_id],
        ) {
            Ok(_) => {
                tx.execute(
                    "UPDATE photos SET likes_count = likes_count + 1 WHERE id = ?1",
                    params![photo_id],
                )?;
            }
            // A concurrent toggle got there first; the like already counts.
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!("Like on photo {} by {} already present", photo_id, user_id);
            }
            Err(e) => return Err(e.into()),
        }
        LikeAction::Liked
    };

    let likes_count = likes_count(&tx, photo_id)?;
    tx.commit()?;

    Ok(LikeOutcome {
        action,
        likes_count,
    })
}

pub fn like_status(pool: &DbPool, photo_id: i64, user_id: i64) -> AppResult<LikeStatus> {
    let conn = pool.get()?;
    ensure_photo(&conn, photo_id)?;

    let liked: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM likes WHERE photo_id = ?1 AND user_id = ?2",
        params![photo_id, user_id],
        |r| r.get(0),
    )?;

    Ok(LikeStatus {
        liked,
        likes_count: likes_count(&conn, photo_id)?,
    })
}

pub fn add_comment(pool: &DbPool, photo_id: i64, user_id: i64, text: &str) -> AppResult<Comment> {
    let body = text.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".into()));
    }

    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    ensure_photo(&tx, photo_id)?;
    ensure_user(&tx, user_id)?;

    tx.execute(
        "INSERT INTO comments (photo_id, user_id, body) VALUES (?1, ?2, ?3)",
        params![photo_id, user_id, body],
    )?;
    let comment_id = tx.last_insert_rowid();

    let comment = tx.query_row(
        "SELECT c.id, c.photo_id, c.user_id, u.name, c.body, c.created_at
         FROM comments c
         JOIN users u ON u.id = c.user_id
         WHERE c.id = ?1",
        params![comment_id],
        comment_from_row,
    )?;
    tx.commit()?;

    Ok(comment)
}

/// Comments on a photo, newest first.
pub fn list_comments(pool: &DbPool, photo_id: i64) -> AppResult<Vec<Comment>> {
    let conn = pool.get()?;
    ensure_photo(&conn, photo_id)?;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.photo_id, c.user_id, u.name, c.body, c.created_at
         FROM comments c
         JOIN users u ON u.id = c.user_id
         WHERE c.photo_id = ?1
         ORDER BY c.created_at DESC, c.id DESC",
    )?;

    let comments = stmt
        .query_map(params![photo_id], comment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(comments)
}

fn likes_count(conn: &Connection, photo_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT likes_count FROM photos WHERE id = ?1",
        params![photo_id],
        |r| r.get(0),
    )?)
}

fn comment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        photo_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        body: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
