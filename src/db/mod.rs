pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::catalog::ROSTER;
use crate::state::DbPool;

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../../migrations/001_initial.sql"),
)];

const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 5000;
";

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager =
        SqliteConnectionManager::file(db_path).with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
    let pool = Pool::builder().max_size(8).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

/// Fill an empty `users` table from the class roster.
///
/// Returns how many rows were inserted; zero when the table already had
/// students in it.
pub fn seed_roster(pool: &DbPool) -> anyhow::Result<usize> {
    let mut conn = pool.get()?;
    let tx = conn.transaction()?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if existing > 0 {
        tracing::debug!("Roster already seeded ({} students)", existing);
        return Ok(0);
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO users (id, external_id, name, nickname) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for entry in ROSTER {
            stmt.execute(params![
                entry.id,
                entry.external_id,
                entry.name,
                entry.nickname
            ])?;
        }
    }
    tx.commit()?;

    tracing::info!("Seeded {} students", ROSTER.len());
    Ok(ROSTER.len())
}

/// Single-connection in-memory pool with the schema and roster loaded.
#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory().with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    run_migrations(&pool).unwrap();
    seed_roster(&pool).unwrap();
    pool
}
