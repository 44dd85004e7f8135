//! Annotator judgment store
//!
//! Judgments are unique per (item, annotator). Submitting again replaces the
//! labels in place; clearing deletes the row.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, error};
use uuid::Uuid;

use crate::db::items::require_item;
use crate::labels::LabelPair;
use crate::models::{AnnotatorRole, Judgment};
use crate::{Error, Result};

/// All judgments, optionally restricted to one item
pub async fn list_judgments(pool: &SqlitePool, item_id: Option<i64>) -> Result<Vec<Judgment>> {
    let rows = match item_id {
        Some(id) => {
            sqlx::query(
                r#"
                SELECT guid, item_id, role, sentiment, discourse, updated_at
                FROM judgments
                WHERE item_id = ?
                ORDER BY role ASC
                "#,
            )
            .bind(id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT guid, item_id, role, sentiment, discourse, updated_at
                FROM judgments
                ORDER BY item_id ASC, role ASC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(judgment_from_row).collect()
}

/// Create or replace the judgment of `role` on `item_id`
pub async fn upsert_judgment(
    pool: &SqlitePool,
    item_id: i64,
    role: AnnotatorRole,
    labels: LabelPair,
) -> Result<Judgment> {
    require_item(pool, item_id).await?;

    let judgment = Judgment::new(item_id, role, labels);

    sqlx::query(
        r#"
        INSERT INTO judgments (guid, item_id, role, sentiment, discourse, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(item_id, role) DO UPDATE SET
            sentiment = excluded.sentiment,
            discourse = excluded.discourse,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(judgment.guid.to_string())
    .bind(item_id)
    .bind(role.as_str())
    .bind(labels.sentiment.to_string())
    .bind(labels.discourse.to_string())
    .bind(judgment.updated_at)
    .execute(pool)
    .await?;

    debug!(item_id, role = role.as_str(), "Saved judgment");

    // Re-read so an update reports the original guid
    get_judgment(pool, item_id, role)
        .await?
        .ok_or_else(|| {
            Error::Internal(format!("judgment for item {} vanished after save", item_id))
        })
}

pub async fn get_judgment(
    pool: &SqlitePool,
    item_id: i64,
    role: AnnotatorRole,
) -> Result<Option<Judgment>> {
    let row = sqlx::query(
        r#"
        SELECT guid, item_id, role, sentiment, discourse, updated_at
        FROM judgments
        WHERE item_id = ? AND role = ?
        "#,
    )
    .bind(item_id)
    .bind(role.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(judgment_from_row).transpose()
}

/// Clear a judgment. Returns whether a row existed.
pub async fn delete_judgment(pool: &SqlitePool, item_id: i64, role: AnnotatorRole) -> Result<bool> {
    let result = sqlx::query("DELETE FROM judgments WHERE item_id = ? AND role = ?")
        .bind(item_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn judgment_from_row(row: &SqliteRow) -> Result<Judgment> {
    decode_judgment(row).map_err(|e| {
        if matches!(e, Error::DataIntegrity(_)) {
            error!("Stored judgment is invalid: {}", e);
        }
        e
    })
}

fn decode_judgment(row: &SqliteRow) -> Result<Judgment> {
    let guid: String = row.try_get("guid")?;
    let role: String = row.try_get("role")?;
    let sentiment: String = row.try_get("sentiment")?;
    let discourse: String = row.try_get("discourse")?;

    Ok(Judgment {
        guid: parse_guid(&guid)?,
        item_id: row.try_get("item_id")?,
        role: parse_role(&role)?,
        sentiment: sentiment.parse()?,
        discourse: discourse.parse()?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

pub(crate) fn parse_guid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::DataIntegrity(format!("invalid guid '{}': {}", s, e)))
}

fn parse_role(s: &str) -> Result<AnnotatorRole> {
    s.parse()
        .map_err(|_| Error::DataIntegrity(format!("invalid annotator role '{}'", s)))
}
