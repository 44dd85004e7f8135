//! Annotation data model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::labels::{Discourse, LabelPair, Sentiment};
use crate::{Error, Result};

/// An annotatable comment. Owned by the comment store, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    /// Stable key from the source dataset
    pub external_key: String,
    pub text: String,
    /// Title of the context the comment was posted under
    pub title: String,
    pub like_count: i64,
    pub source_url: Option<String>,
}

/// Item registration payload (id is assigned by the store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub external_key: String,
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// The two fixed annotator identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotatorRole {
    #[serde(rename = "annotator1")]
    Annotator1,
    #[serde(rename = "annotator2")]
    Annotator2,
}

impl AnnotatorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annotator1 => "annotator1",
            Self::Annotator2 => "annotator2",
        }
    }
}

/// Acting role of a request.
///
/// Passed explicitly with every workflow operation; there is no ambient
/// "current user".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "annotator1")]
    Annotator1,
    #[serde(rename = "annotator2")]
    Annotator2,
    #[serde(rename = "adjudicator")]
    Adjudicator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annotator1 => "annotator1",
            Self::Annotator2 => "annotator2",
            Self::Adjudicator => "adjudicator",
        }
    }

    /// Annotator identity of this role; the adjudicator has none
    pub fn annotator(self) -> Result<AnnotatorRole> {
        match self {
            Self::Annotator1 => Ok(AnnotatorRole::Annotator1),
            Self::Annotator2 => Ok(AnnotatorRole::Annotator2),
            Self::Adjudicator => Err(Error::Forbidden(
                "adjudicator cannot submit annotator judgments".to_string(),
            )),
        }
    }

    /// Only the adjudicator may create or change final decisions
    pub fn require_adjudicator(self) -> Result<()> {
        match self {
            Self::Adjudicator => Ok(()),
            other => Err(Error::Forbidden(format!(
                "{} cannot modify final decisions",
                other.as_str()
            ))),
        }
    }
}

impl From<AnnotatorRole> for Role {
    fn from(role: AnnotatorRole) -> Self {
        match role {
            AnnotatorRole::Annotator1 => Role::Annotator1,
            AnnotatorRole::Annotator2 => Role::Annotator2,
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annotator1" => Ok(Self::Annotator1),
            "annotator2" => Ok(Self::Annotator2),
            "adjudicator" => Ok(Self::Adjudicator),
            other => Err(Error::InvalidInput(format!("unknown role '{}'", other))),
        }
    }
}

impl FromStr for AnnotatorRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<Role>()?.annotator()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AnnotatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotator's label pair for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub guid: Uuid,
    pub item_id: i64,
    pub role: AnnotatorRole,
    pub sentiment: Sentiment,
    pub discourse: Discourse,
    pub updated_at: DateTime<Utc>,
}

impl Judgment {
    pub fn new(item_id: i64, role: AnnotatorRole, labels: LabelPair) -> Self {
        Self {
            guid: Uuid::new_v4(),
            item_id,
            role,
            sentiment: labels.sentiment,
            discourse: labels.discourse,
            updated_at: Utc::now(),
        }
    }
}

/// The adjudicator's authoritative label pair for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub guid: Uuid,
    pub item_id: i64,
    pub sentiment: Sentiment,
    pub discourse: Discourse,
    pub updated_at: DateTime<Utc>,
}

impl FinalDecision {
    pub fn new(item_id: i64, labels: LabelPair) -> Self {
        Self {
            guid: Uuid::new_v4(),
            item_id,
            sentiment: labels.sentiment,
            discourse: labels.discourse,
            updated_at: Utc::now(),
        }
    }
}
