//! Work-queue navigation for annotators and the adjudicator
//!
//! Built fresh from a store snapshot on every request. Judgments removed
//! between fetch and build simply leave their item `INCOMPLETE`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::disagreement::{classify_item, ItemState};
use crate::models::{AnnotatorRole, FinalDecision, Judgment};
use crate::Result;

/// Item handed to the adjudicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub item_id: i64,
    pub state: ItemState,
}

/// Number of items in each state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueSummary {
    pub total: usize,
    pub incomplete: usize,
    pub complete_agree: usize,
    pub complete_disagree: usize,
    pub finalized: usize,
}

/// Adjudication state of every known item, keyed by item id
#[derive(Debug, Clone, Default)]
pub struct AdjudicationQueue {
    states: BTreeMap<i64, ItemState>,
}

impl AdjudicationQueue {
    /// Classify every item in `item_ids`.
    ///
    /// Judgments and decisions for ids not listed are ignored.
    pub fn from_snapshot(
        item_ids: &[i64],
        judgments: &[Judgment],
        decisions: &[FinalDecision],
    ) -> Result<Self> {
        let mut by_item: BTreeMap<i64, Vec<Judgment>> =
            item_ids.iter().map(|id| (*id, Vec::new())).collect();
        for judgment in judgments {
            if let Some(list) = by_item.get_mut(&judgment.item_id) {
                list.push(judgment.clone());
            }
        }

        let finalized: HashSet<i64> = decisions.iter().map(|d| d.item_id).collect();

        let mut states = BTreeMap::new();
        for (item_id, item_judgments) in by_item {
            let state = classify_item(&item_judgments, finalized.contains(&item_id))?;
            states.insert(item_id, state);
        }

        Ok(Self { states })
    }

    pub fn state_of(&self, item_id: i64) -> Option<ItemState> {
        self.states.get(&item_id).copied()
    }

    /// Next item for the adjudicator.
    ///
    /// Lowest-id disagreement first; otherwise the lowest-id agreed item
    /// still lacking a final decision; otherwise `None` (queue empty).
    pub fn next_work_item(&self) -> Option<WorkItem> {
        [ItemState::CompleteDisagree, ItemState::CompleteAgree]
            .into_iter()
            .find_map(|wanted| {
                self.states
                    .iter()
                    .find(|(_, state)| **state == wanted)
                    .map(|(id, state)| WorkItem {
                        item_id: *id,
                        state: *state,
                    })
            })
    }

    pub fn summary(&self) -> QueueSummary {
        let mut summary = QueueSummary {
            total: self.states.len(),
            ..QueueSummary::default()
        };
        for state in self.states.values() {
            match state {
                ItemState::Incomplete => summary.incomplete += 1,
                ItemState::CompleteAgree => summary.complete_agree += 1,
                ItemState::CompleteDisagree => summary.complete_disagree += 1,
                ItemState::Finalized => summary.finalized += 1,
            }
        }
        summary
    }
}

/// Lowest-id item the given annotator has not judged yet
pub fn next_unannotated(
    item_ids: &[i64],
    judgments: &[Judgment],
    role: AnnotatorRole,
) -> Option<i64> {
    let done: HashSet<i64> = judgments
        .iter()
        .filter(|j| j.role == role)
        .map(|j| j.item_id)
        .collect();

    item_ids.iter().copied().filter(|id| !done.contains(id)).min()
}
