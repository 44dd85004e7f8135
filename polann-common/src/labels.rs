//! Label dimensions and their fixed orderings
//!
//! Each dimension has a closed label set. The declaration order of the enum
//! variants is the row/column order used by confusion matrices, so it must
//! not be sorted or reordered at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A categorical label drawn from a fixed, ordered label set
pub trait Label: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Dimension name used in reports and error messages
    const DIMENSION: &'static str;

    /// Every label of the dimension, in matrix order
    const ALL: &'static [Self];

    /// Position of this label within [`Label::ALL`]
    fn index(self) -> usize;

    /// Stored / wire representation
    fn as_str(self) -> &'static str;

    /// Wire names of every label, in matrix order
    fn names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.as_str().to_string()).collect()
    }
}

/// Sentiment expressed by a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Label for Sentiment {
    const DIMENSION: &'static str = "sentiment";
    const ALL: &'static [Self] = &[Self::Positive, Self::Negative, Self::Neutral];

    fn index(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Discourse polarization of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discourse {
    Partisan,
    Objective,
    NonPolarized,
}

impl Label for Discourse {
    const DIMENSION: &'static str = "discourse";
    const ALL: &'static [Self] = &[Self::Partisan, Self::Objective, Self::NonPolarized];

    fn index(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Partisan => "partisan",
            Self::Objective => "objective",
            Self::NonPolarized => "non_polarized",
        }
    }
}

/// Parse a stored label, rejecting anything outside the fixed set.
///
/// Unknown values are a data-integrity problem upstream and are never
/// coerced into a default label.
fn parse_label<L: Label>(s: &str) -> Result<L> {
    L::ALL
        .iter()
        .copied()
        .find(|l| l.as_str() == s)
        .ok_or_else(|| {
            Error::DataIntegrity(format!("unknown {} label '{}'", L::DIMENSION, s))
        })
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_label(s)
    }
}

impl FromStr for Discourse {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_label(s)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Discourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label per dimension, as submitted by an annotator or the adjudicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    pub sentiment: Sentiment,
    pub discourse: Discourse,
}

impl LabelPair {
    pub fn new(sentiment: Sentiment, discourse: Discourse) -> Self {
        Self {
            sentiment,
            discourse,
        }
    }
}
