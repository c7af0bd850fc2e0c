use rusqlite::{params, Connection, TransactionBehavior};

use crate::db::models::Photo;
use crate::error::{AppError, AppResult};
use crate::state::DbPool;
use crate::storage::{StorageBackend, StoredObject};

/// Category value that means "no filter".
pub const ALL_CATEGORIES: &str = "all";

const PHOTO_SELECT: &str = "
    SELECT p.id, p.user_id, u.name, p.storage_key, p.url, p.provider_id,
           p.title, p.description, p.category, p.uploaded_at, p.likes_count,
           (SELECT COUNT(*) FROM comments c WHERE c.photo_id = p.id) AS comments_count
    FROM photos p
    JOIN users u ON u.id = p.user_id";

/// Photos newest first, optionally limited to one category.
pub fn list_photos(pool: &DbPool, category: Option<&str>) -> AppResult<Vec<Photo>> {
    let filter = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "{} WHERE (?1 IS NULL OR p.category = ?1) ORDER BY p.uploaded_at DESC, p.id DESC",
        PHOTO_SELECT
    ))?;

    let photos = stmt
        .query_map(params![filter], photo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(photos)
}

pub fn get_photo(pool: &DbPool, photo_id: i64) -> AppResult<Photo> {
    let conn = pool.get()?;
    fetch_photo(&conn, photo_id)
}

pub(crate) fn fetch_photo(conn: &Connection, photo_id: i64) -> AppResult<Photo> {
    conn.query_row(
        &format!("{} WHERE p.id = ?1", PHOTO_SELECT),
        params![photo_id],
        photo_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("Photo"),
        other => other.into(),
    })
}

/// Distinct categories that currently have photos, sorted.
pub fn categories(pool: &DbPool) -> AppResult<Vec<String>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT DISTINCT category FROM photos ORDER BY category")?;
    let categories = stmt
        .query_map([], |r| r.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(categories)
}

/// Remove a photo together with its likes and comments. Only the uploader
/// may delete. The stored image is removed after the rows are gone; a
/// failure there is logged and otherwise ignored.
pub async fn delete_photo(
    pool: &DbPool,
    backend: Option<&dyn StorageBackend>,
    photo_id: i64,
    user_id: i64,
) -> AppResult<()> {
    let object = {
        let mut conn = pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let photo = fetch_photo(&tx, photo_id)?;
        if photo.user_id != user_id {
            return Err(AppError::Unauthorized);
        }

        tx.execute("DELETE FROM likes WHERE photo_id = ?1", params![photo_id])?;
        tx.execute("DELETE FROM comments WHERE photo_id = ?1", params![photo_id])?;
        tx.execute("DELETE FROM photos WHERE id = ?1", params![photo_id])?;
        tx.commit()?;

        StoredObject {
            key: photo.storage_key,
            url: photo.url,
            provider_id: photo.provider_id,
        }
    };

    tracing::info!("Deleted photo {} ({})", photo_id, object.key);

    match backend {
        Some(backend) => {
            if let Err(e) = backend.delete(&object).await {
                tracing::warn!(
                    "Photo {} removed but {} storage kept {}: {}",
                    photo_id,
                    backend.name(),
                    object.key,
                    e
                );
            }
        }
        None => tracing::warn!("No storage backend; leaving {} in place", object.key),
    }

    Ok(())
}

fn photo_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        user_id: row.get(1)?,
        uploader_name: row.get(2)?,
        storage_key: row.get(3)?,
        url: row.get(4)?,
        provider_id: row.get(5)?,
        title: row.get(6)?,
        description: row.get(7)?,
        category: row.get(8)?,
        uploaded_at: row.get(9)?,
        likes_count: row.get(10)?,
        comments_count: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::engagement::{add_comment, toggle_like};
    use crate::services::insert_test_photo;
    use crate::storage::LocalStorage;

    fn seeded() -> DbPool {
        let pool = test_pool();
        {
            let conn = pool.get().unwrap();
            insert_test_photo(&conn, 1, "belajar.jpg", "kegiatan");
            insert_test_photo(&conn, 2, "router.png", "praktikum");
            insert_test_photo(&conn, 3, "crimping.gif", "praktikum");
        }
        pool
    }

    fn titles(photos: &[Photo]) -> Vec<&str> {
        photos.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn lists_all_photos_newest_first() {
        let pool = seeded();
        let expected = vec!["crimping.gif", "router.png", "belajar.jpg"];
        assert_eq!(titles(&list_photos(&pool, None).unwrap()), expected);
        assert_eq!(titles(&list_photos(&pool, Some("all")).unwrap()), expected);
        assert_eq!(titles(&list_photos(&pool, Some("")).unwrap()), expected);
    }

    #[test]
    fn filters_by_category() {
        let pool = seeded();
        let photos = list_photos(&pool, Some("praktikum")).unwrap();
        assert_eq!(titles(&photos), vec!["crimping.gif", "router.png"]);
        assert!(photos.iter().all(|p| p.category == "praktikum"));
    }

    #[test]
    fn unknown_category_is_empty_not_error() {
        let pool = seeded();
        assert!(list_photos(&pool, Some("acara")).unwrap().is_empty());
    }

    #[test]
    fn uploader_name_and_counts_are_filled_in() {
        let pool = seeded();
        let photo_id = list_photos(&pool, Some("kegiatan")).unwrap()[0].id;
        add_comment(&pool, photo_id, 4, "keren").unwrap();
        add_comment(&pool, photo_id, 5, "mantap").unwrap();
        toggle_like(&pool, photo_id, 6).unwrap();

        let photo = get_photo(&pool, photo_id).unwrap();
        assert_eq!(photo.uploader_name, "Abdirrohman Maulana Sumantri");
        assert_eq!(photo.comments_count, 2);
        assert_eq!(photo.likes_count, 1);
    }

    #[test]
    fn get_missing_photo_is_not_found() {
        let pool = test_pool();
        assert!(matches!(
            get_photo(&pool, 1).unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let pool = seeded();
        assert_eq!(categories(&pool).unwrap(), vec!["kegiatan", "praktikum"]);
    }

    #[tokio::test]
    async fn delete_removes_likes_comments_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("belajar.jpg"), b"jpg").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let pool = seeded();
        let photo_id = list_photos(&pool, Some("kegiatan")).unwrap()[0].id;
        toggle_like(&pool, photo_id, 2).unwrap();
        add_comment(&pool, photo_id, 2, "hapus?").unwrap();

        delete_photo(&pool, Some(&storage as &dyn StorageBackend), photo_id, 1).await.unwrap();

        let conn = pool.get().unwrap();
        let leftovers: i64 = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM likes WHERE photo_id = ?1)
                      + (SELECT COUNT(*) FROM comments WHERE photo_id = ?1)
                      + (SELECT COUNT(*) FROM photos WHERE id = ?1)",
                params![photo_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(leftovers, 0);
        assert!(!tmp.path().join("belajar.jpg").exists());
    }

    #[tokio::test]
    async fn only_uploader_may_delete() {
        let pool = seeded();
        let photo_id = list_photos(&pool, Some("kegiatan")).unwrap()[0].id;

        let err = delete_photo(&pool, None, photo_id, 2).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(get_photo(&pool, photo_id).is_ok());
    }
}
