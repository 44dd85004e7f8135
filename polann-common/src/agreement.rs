//! Inter-annotator agreement (Cohen's Kappa)
//!
//! Every report is recomputed from a fresh judgment snapshot. Nothing here
//! is cached or updated incrementally; the datasets are small enough that a
//! full pass per request is the whole design.
//!
//! The two label dimensions are scored independently.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::labels::{Discourse, Label, Sentiment};
use crate::models::Judgment;
use crate::pairs::extract_complete_pairs;
use crate::{Error, Result};

/// Co-occurrence counts between annotator1 (rows) and annotator2 (columns).
///
/// Rows and columns follow the dimension's fixed label order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix<L: Label> {
    counts: Vec<Vec<u64>>,
    total: u64,
    _labels: PhantomData<L>,
}

impl<L: Label> ConfusionMatrix<L> {
    /// Build the matrix from index-aligned label sequences
    pub fn from_sequences(seq1: &[L], seq2: &[L]) -> Result<Self> {
        if seq1.len() != seq2.len() {
            return Err(Error::InvalidInput(format!(
                "{} sequences differ in length ({} vs {})",
                L::DIMENSION,
                seq1.len(),
                seq2.len()
            )));
        }

        let k = L::ALL.len();
        let mut counts = vec![vec![0u64; k]; k];
        for (a, b) in seq1.iter().zip(seq2) {
            counts[a.index()][b.index()] += 1;
        }

        Ok(Self {
            counts,
            total: seq1.len() as u64,
            _labels: PhantomData,
        })
    }

    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Number of pairs counted (sum of all cells)
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn diagonal_sum(&self) -> u64 {
        (0..self.counts.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Annotator1 label distribution (`p1`)
    pub fn row_marginals(&self) -> Vec<f64> {
        let n = self.total as f64;
        self.counts
            .iter()
            .map(|row| row.iter().sum::<u64>() as f64 / n)
            .collect()
    }

    /// Annotator2 label distribution (`p2`)
    pub fn column_marginals(&self) -> Vec<f64> {
        let n = self.total as f64;
        (0..self.counts.len())
            .map(|c| self.counts.iter().map(|row| row[c]).sum::<u64>() as f64 / n)
            .collect()
    }

    /// `Po`: share of pairs on the diagonal
    pub fn observed_agreement(&self) -> f64 {
        self.diagonal_sum() as f64 / self.total as f64
    }

    /// `Pe`: agreement expected by chance, assuming independent annotators
    pub fn expected_agreement(&self) -> f64 {
        self.row_marginals()
            .iter()
            .zip(self.column_marginals())
            .map(|(p1, p2)| p1 * p2)
            .sum()
    }
}

/// Cohen's Kappa from observed and expected agreement.
///
/// When chance agreement is already total (`Pe == 1`, both annotators used a
/// single identical label throughout) kappa is defined as 1.
pub fn cohens_kappa(observed: f64, expected: f64) -> f64 {
    if expected == 1.0 {
        1.0
    } else {
        (observed - expected) / (1.0 - expected)
    }
}

/// Qualitative band for a kappa value. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    Poor,
    Slight,
    Fair,
    Moderate,
    Substantial,
    #[serde(rename = "Almost Perfect")]
    AlmostPerfect,
}

impl Interpretation {
    /// Bands are closed on their lower bound
    pub fn from_kappa(kappa: f64) -> Self {
        if kappa < 0.0 {
            Self::Poor
        } else if kappa < 0.20 {
            Self::Slight
        } else if kappa < 0.40 {
            Self::Fair
        } else if kappa < 0.60 {
            Self::Moderate
        } else if kappa < 0.80 {
            Self::Substantial
        } else {
            Self::AlmostPerfect
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Slight => "Slight",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Substantial => "Substantial",
            Self::AlmostPerfect => "Almost Perfect",
        }
    }
}

/// Agreement statistics for one label dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementReport {
    pub dimension: String,
    /// Row/column order of `matrix`
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<u64>>,
    pub pair_count: u64,
    pub observed_agreement: f64,
    pub expected_agreement: f64,
    pub kappa: f64,
    pub interpretation: Interpretation,
}

/// Score two index-aligned label sequences.
///
/// Returns [`Error::InsufficientData`] for empty input instead of dividing
/// by zero.
pub fn compute_agreement<L: Label>(seq1: &[L], seq2: &[L]) -> Result<AgreementReport> {
    let matrix = ConfusionMatrix::<L>::from_sequences(seq1, seq2)?;
    if matrix.total() == 0 {
        return Err(Error::InsufficientData(format!(
            "no complete pairs for {}",
            L::DIMENSION
        )));
    }

    let observed = matrix.observed_agreement();
    let expected = matrix.expected_agreement();
    let kappa = cohens_kappa(observed, expected);

    debug!(
        dimension = L::DIMENSION,
        pairs = matrix.total(),
        observed,
        expected,
        kappa,
        "Computed agreement"
    );

    Ok(AgreementReport {
        dimension: L::DIMENSION.to_string(),
        labels: L::names(),
        matrix: matrix.counts().to_vec(),
        pair_count: matrix.total(),
        observed_agreement: observed,
        expected_agreement: expected,
        kappa,
        interpretation: Interpretation::from_kappa(kappa),
    })
}

/// Result for one dimension: a report, or a notice explaining why none exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DimensionOutcome {
    Report(AgreementReport),
    Notice { message: String },
}

impl DimensionOutcome {
    pub fn report(&self) -> Option<&AgreementReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Notice { .. } => None,
        }
    }
}

/// Agreement across both dimensions plus coverage counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub total_items: usize,
    pub complete_pairs: usize,
    /// Items judged by exactly one annotator
    pub incomplete_items: usize,
    pub sentiment: DimensionOutcome,
    pub discourse: DimensionOutcome,
}

/// Compute both dimension reports from a judgment snapshot.
///
/// Insufficient data becomes a notice; integrity violations propagate.
pub fn summarize_agreement(total_items: usize, judgments: &[Judgment]) -> Result<AgreementSummary> {
    let pairs = extract_complete_pairs(judgments)?;

    let sentiment = outcome(compute_agreement::<Sentiment>(
        &pairs.annotator1_sentiment,
        &pairs.annotator2_sentiment,
    ))?;
    let discourse = outcome(compute_agreement::<Discourse>(
        &pairs.annotator1_discourse,
        &pairs.annotator2_discourse,
    ))?;

    Ok(AgreementSummary {
        total_items,
        complete_pairs: pairs.len(),
        incomplete_items: pairs.incomplete_items,
        sentiment,
        discourse,
    })
}

const NO_PAIRS_NOTICE: &str = "No complete annotation pairs yet; both annotators must label \
the same comments before agreement can be computed.";

fn outcome(result: Result<AgreementReport>) -> Result<DimensionOutcome> {
    match result {
        Ok(report) => Ok(DimensionOutcome::Report(report)),
        Err(Error::InsufficientData(message)) => {
            info!("Agreement skipped: {}", message);
            Ok(DimensionOutcome::Notice {
                message: NO_PAIRS_NOTICE.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
