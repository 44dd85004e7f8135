//! # polann Common Library
//!
//! Shared code for the polann annotation service:
//! - Label dimensions and the annotation data model
//! - Inter-annotator agreement (Cohen's Kappa)
//! - Disagreement detection and adjudication queue
//! - SQLite comment/annotation store
//! - Configuration loading

pub mod agreement;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod disagreement;
pub mod error;
pub mod labels;
pub mod models;
pub mod pairs;
pub mod queue;

pub use error::{Error, Result};
pub use labels::{Discourse, Label, LabelPair, Sentiment};
pub use models::{AnnotatorRole, FinalDecision, Item, Judgment, NewItem, Role};
