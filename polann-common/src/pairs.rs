//! Complete-pair extraction
//!
//! Turns a judgment snapshot into index-aligned label sequences for the
//! agreement engine. Only items judged by both annotators contribute; items
//! still in progress are skipped without comment.

use std::collections::BTreeMap;

use tracing::error;

use crate::labels::{Discourse, Sentiment};
use crate::models::{AnnotatorRole, Judgment};
use crate::{Error, Result};

/// Index-aligned label sequences built from complete pairs.
///
/// For every index `i`, `annotator1_*[i]` and `annotator2_*[i]` belong to
/// `item_ids[i]`. Items appear in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletePairs {
    pub item_ids: Vec<i64>,
    pub annotator1_sentiment: Vec<Sentiment>,
    pub annotator2_sentiment: Vec<Sentiment>,
    pub annotator1_discourse: Vec<Discourse>,
    pub annotator2_discourse: Vec<Discourse>,
    /// Items with a judgment from only one annotator
    pub incomplete_items: usize,
}

impl CompletePairs {
    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Per-item slots, one per annotator
#[derive(Default)]
struct Slots<'a> {
    annotator1: Option<&'a Judgment>,
    annotator2: Option<&'a Judgment>,
}

/// Group judgments by item and keep items with one judgment per annotator.
///
/// Two judgments from the same annotator on one item break the
/// (item, annotator) uniqueness invariant and are reported as
/// [`Error::DataIntegrity`] rather than resolved arbitrarily.
pub fn extract_complete_pairs(judgments: &[Judgment]) -> Result<CompletePairs> {
    let grouped = group_by_item(judgments)?;

    let mut pairs = CompletePairs::default();
    for (item_id, slots) in grouped {
        match (slots.annotator1, slots.annotator2) {
            (Some(a), Some(b)) => {
                pairs.item_ids.push(item_id);
                pairs.annotator1_sentiment.push(a.sentiment);
                pairs.annotator2_sentiment.push(b.sentiment);
                pairs.annotator1_discourse.push(a.discourse);
                pairs.annotator2_discourse.push(b.discourse);
            }
            _ => pairs.incomplete_items += 1,
        }
    }

    Ok(pairs)
}

fn group_by_item(judgments: &[Judgment]) -> Result<BTreeMap<i64, Slots<'_>>> {
    let mut grouped: BTreeMap<i64, Slots<'_>> = BTreeMap::new();

    for judgment in judgments {
        let slots = grouped.entry(judgment.item_id).or_default();
        let slot = match judgment.role {
            AnnotatorRole::Annotator1 => &mut slots.annotator1,
            AnnotatorRole::Annotator2 => &mut slots.annotator2,
        };
        if slot.is_some() {
            error!(
                item_id = judgment.item_id,
                role = judgment.role.as_str(),
                "Duplicate judgment for annotator"
            );
            return Err(Error::DataIntegrity(format!(
                "item {} has more than one judgment from {}",
                judgment.item_id, judgment.role
            )));
        }
        *slot = Some(judgment);
    }

    Ok(grouped)
}
