//! Final decision store (one adjudicated label pair per item)

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{error, info};

use crate::db::items::require_item;
use crate::db::judgments::parse_guid;
use crate::labels::{Label, LabelPair};
use crate::models::FinalDecision;
use crate::{Error, Result};

pub async fn list_final_decisions(pool: &SqlitePool) -> Result<Vec<FinalDecision>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, item_id, sentiment, discourse, updated_at
        FROM final_decisions
        ORDER BY item_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(decision_from_row).collect()
}

pub async fn get_final_decision(pool: &SqlitePool, item_id: i64) -> Result<Option<FinalDecision>> {
    let row = sqlx::query(
        r#"
        SELECT guid, item_id, sentiment, discourse, updated_at
        FROM final_decisions
        WHERE item_id = ?
        "#,
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(decision_from_row).transpose()
}

/// Create or replace the final decision for an item.
///
/// Role checks belong to the caller; this layer only enforces uniqueness.
pub async fn upsert_final_decision(
    pool: &SqlitePool,
    item_id: i64,
    labels: LabelPair,
) -> Result<FinalDecision> {
    require_item(pool, item_id).await?;

    let decision = FinalDecision::new(item_id, labels);

    sqlx::query(
        r#"
        INSERT INTO final_decisions (guid, item_id, sentiment, discourse, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(item_id) DO UPDATE SET
            sentiment = excluded.sentiment,
            discourse = excluded.discourse,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(decision.guid.to_string())
    .bind(item_id)
    .bind(labels.sentiment.to_string())
    .bind(labels.discourse.to_string())
    .bind(decision.updated_at)
    .execute(pool)
    .await?;

    info!(
        item_id,
        sentiment = labels.sentiment.as_str(),
        discourse = labels.discourse.as_str(),
        "Final decision saved"
    );

    get_final_decision(pool, item_id)
        .await?
        .ok_or_else(|| {
            Error::Internal(format!("final decision for item {} vanished after save", item_id))
        })
}

/// Remove a final decision. Returns whether one existed.
pub async fn delete_final_decision(pool: &SqlitePool, item_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM final_decisions WHERE item_id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn decision_from_row(row: &SqliteRow) -> Result<FinalDecision> {
    decode_decision(row).map_err(|e| {
        if matches!(e, Error::DataIntegrity(_)) {
            error!("Stored final decision is invalid: {}", e);
        }
        e
    })
}

fn decode_decision(row: &SqliteRow) -> Result<FinalDecision> {
    let guid: String = row.try_get("guid")?;
    let sentiment: String = row.try_get("sentiment")?;
    let discourse: String = row.try_get("discourse")?;

    Ok(FinalDecision {
        guid: parse_guid(&guid)?,
        item_id: row.try_get("item_id")?,
        sentiment: sentiment.parse()?,
        discourse: discourse.parse()?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
