//! COD reconciliation engine
//!
//! Classifies a cash-collection attempt against its expectation: the amount a
//! rider was expected to hand in versus what was actually counted. The same
//! calculation backs the collection dialog, cash verification, and the
//! close-runsheet gate, so it lives here once instead of being re-derived at
//! every call site.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Outcome of comparing collected cash against the expected amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationOutcome {
    /// Collected amount matches the expectation (within tolerance)
    Matched,
    /// Collected less than expected
    Shortfall,
    /// Collected more than expected
    Excess,
}

impl ReconciliationOutcome {
    /// Whether this outcome needs an operator-supplied discrepancy reason
    /// before the attempt can be verified
    pub fn requires_justification(&self) -> bool {
        !matches!(self, ReconciliationOutcome::Matched)
    }
}

/// Result of reconciling a collection against its expectation
///
/// The field shape is a fixed contract: every consumer (collection records,
/// verification reports, serialized API responses) agrees on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Amount the rider was expected to collect
    pub expected: BigDecimal,
    /// Amount actually handed in
    pub collected: BigDecimal,
    /// Signed difference: collected - expected
    pub difference: BigDecimal,
    /// Classification of the difference
    pub outcome: ReconciliationOutcome,
}

impl ReconciliationResult {
    /// Evaluate a collection against its expectation with zero tolerance
    pub fn evaluate(
        expected: BigDecimal,
        collected: BigDecimal,
    ) -> Result<Self, ReconciliationError> {
        Self::evaluate_with_tolerance(expected, collected, BigDecimal::from(0))
    }

    /// Evaluate a collection against its expectation
    ///
    /// `Matched` iff `|collected - expected| <= tolerance`, otherwise
    /// `Shortfall` for under-collection and `Excess` for over-collection.
    /// Negative amounts are input errors, not reconciliation outcomes.
    pub fn evaluate_with_tolerance(
        expected: BigDecimal,
        collected: BigDecimal,
        tolerance: BigDecimal,
    ) -> Result<Self, ReconciliationError> {
        let zero = BigDecimal::from(0);

        if expected < zero {
            return Err(ReconciliationError::NegativeAmount(format!(
                "expected amount cannot be negative: {}",
                expected
            )));
        }
        if collected < zero {
            return Err(ReconciliationError::NegativeAmount(format!(
                "collected amount cannot be negative: {}",
                collected
            )));
        }
        if tolerance < zero {
            return Err(ReconciliationError::NegativeTolerance(format!(
                "tolerance cannot be negative: {}",
                tolerance
            )));
        }

        let difference = &collected - &expected;

        let outcome = if difference.abs() <= tolerance {
            ReconciliationOutcome::Matched
        } else if difference < zero {
            ReconciliationOutcome::Shortfall
        } else {
            ReconciliationOutcome::Excess
        };

        Ok(Self {
            expected,
            collected,
            difference,
            outcome,
        })
    }

    /// Whether the collection reconciled cleanly
    pub fn is_matched(&self) -> bool {
        self.outcome == ReconciliationOutcome::Matched
    }

    /// Absolute size of the discrepancy, as shown to operators
    pub fn discrepancy(&self) -> BigDecimal {
        self.difference.abs()
    }
}

/// Reconciliation engine with a configured tolerance band
///
/// Tolerance is an explicit, caller-visible setting. Cash counts reconcile
/// exactly by default; a non-zero band only makes sense where rounding on
/// digital payments is in play.
#[derive(Debug, Clone)]
pub struct Reconciler {
    tolerance: BigDecimal,
}

impl Reconciler {
    /// Create a reconciler with the given tolerance band
    pub fn new(tolerance: BigDecimal) -> Result<Self, ReconciliationError> {
        if tolerance < BigDecimal::from(0) {
            return Err(ReconciliationError::NegativeTolerance(format!(
                "tolerance cannot be negative: {}",
                tolerance
            )));
        }
        Ok(Self { tolerance })
    }

    /// Create a reconciler that requires an exact match
    pub fn exact() -> Self {
        Self {
            tolerance: BigDecimal::from(0),
        }
    }

    /// The configured tolerance band
    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    /// Evaluate a collection using the configured tolerance
    pub fn evaluate(
        &self,
        expected: BigDecimal,
        collected: BigDecimal,
    ) -> Result<ReconciliationResult, ReconciliationError> {
        ReconciliationResult::evaluate_with_tolerance(expected, collected, self.tolerance.clone())
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::exact()
    }
}

/// Reconciliation input errors
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Negative amount: {0}")]
    NegativeAmount(String),
    #[error("Negative tolerance: {0}")]
    NegativeTolerance(String),
}
