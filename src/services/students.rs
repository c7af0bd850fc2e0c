use crate::db::models::User;
use crate::error::AppResult;
use crate::state::DbPool;

pub fn list_students(pool: &DbPool) -> AppResult<Vec<User>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, external_id, name, nickname, created_at FROM users ORDER BY id",
    )?;

    let students = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                external_id: row.get(1)?,
                name: row.get(2)?,
                nickname: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(students)
}
