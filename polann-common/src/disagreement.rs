//! Disagreement detection and per-item adjudication state

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::Judgment;
use crate::{Error, Result};

/// Which dimensions the two annotators disagree on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisagreementDetail {
    pub sentiment: bool,
    pub discourse: bool,
}

impl DisagreementDetail {
    pub fn any(&self) -> bool {
        self.sentiment || self.discourse
    }
}

/// Compare the judgments attached to one item.
///
/// `None` while the item has fewer than two judgments. Labels are compared
/// exactly; there is no partial credit between neighbouring labels.
pub fn disagreement_detail(judgments: &[Judgment]) -> Result<Option<DisagreementDetail>> {
    match judgments {
        [] | [_] => Ok(None),
        [a, b] => {
            if a.role == b.role {
                error!(
                    item_id = a.item_id,
                    role = a.role.as_str(),
                    "Duplicate judgment for annotator"
                );
                return Err(Error::DataIntegrity(format!(
                    "item {} has two judgments from {}",
                    a.item_id, a.role
                )));
            }
            Ok(Some(DisagreementDetail {
                sentiment: a.sentiment != b.sentiment,
                discourse: a.discourse != b.discourse,
            }))
        }
        [first, ..] => {
            error!(
                item_id = first.item_id,
                count = judgments.len(),
                "Item has more than two judgments"
            );
            Err(Error::DataIntegrity(format!(
                "item {} has {} judgments, at most 2 allowed",
                first.item_id,
                judgments.len()
            )))
        }
    }
}

/// True iff both judgments exist and differ on either dimension
pub fn has_disagreement(judgments: &[Judgment]) -> Result<Option<bool>> {
    Ok(disagreement_detail(judgments)?.map(|d| d.any()))
}

/// Adjudication-queue state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemState {
    /// Fewer than two judgments
    Incomplete,
    CompleteAgree,
    /// Takes priority in the adjudication queue
    CompleteDisagree,
    /// A final decision exists; judgments no longer matter
    Finalized,
}

/// Derive the state of an item from its judgments and decision flag
pub fn classify_item(judgments: &[Judgment], has_final_decision: bool) -> Result<ItemState> {
    if has_final_decision {
        return Ok(ItemState::Finalized);
    }

    Ok(match has_disagreement(judgments)? {
        None => ItemState::Incomplete,
        Some(false) => ItemState::CompleteAgree,
        Some(true) => ItemState::CompleteDisagree,
    })
}
