//! Comment store

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

use crate::models::{Item, NewItem};
use crate::{Error, Result};

/// Register items, skipping external keys that already exist.
///
/// Returns the number of newly inserted items.
pub async fn insert_items(pool: &SqlitePool, items: &[NewItem]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for item in items {
        if item.external_key.trim().is_empty() {
            return Err(Error::InvalidInput(
                "item external_key cannot be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO items (external_key, text, title, like_count, source_url)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(external_key) DO NOTHING
            "#,
        )
        .bind(&item.external_key)
        .bind(&item.text)
        .bind(&item.title)
        .bind(item.like_count)
        .bind(&item.source_url)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;

    info!(
        "Registered {} new items ({} submitted)",
        inserted,
        items.len()
    );

    Ok(inserted)
}

/// All items in ascending id order
pub async fn list_items(pool: &SqlitePool) -> Result<Vec<Item>> {
    let rows = sqlx::query(
        r#"
        SELECT id, external_key, text, title, like_count, source_url
        FROM items
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(item_from_row).collect())
}

/// Ids of all items, ascending
pub async fn list_item_ids(pool: &SqlitePool) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM items ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<Option<Item>> {
    let row = sqlx::query(
        r#"
        SELECT id, external_key, text, title, like_count, source_url
        FROM items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(item_from_row))
}

/// Fetch an item or fail with [`Error::NotFound`]
pub async fn require_item(pool: &SqlitePool, id: i64) -> Result<Item> {
    get_item(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("item {}", id)))
}

fn item_from_row(row: &SqliteRow) -> Item {
    Item {
        id: row.get("id"),
        external_key: row.get("external_key"),
        text: row.get("text"),
        title: row.get("title"),
        like_count: row.get("like_count"),
        source_url: row.get("source_url"),
    }
}
