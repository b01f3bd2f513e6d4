//! Cash collection recording and verification
//!
//! A collection attempt is born `Pending` and ends `Verified` or `Rejected`.
//! Both end states are terminal: a disputed count is resolved by recording a
//! fresh attempt, never by editing a settled one.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconciliation::{ReconciliationResult, Reconciler};
use crate::traits::*;
use crate::types::*;

/// Verification status of a collection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptStatus {
    /// Awaiting operator verification
    Pending,
    /// Count verified and accepted
    Verified,
    /// Count rejected, sent back for review
    Rejected,
}

impl AttemptStatus {
    /// Whether the attempt has reached an end state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::Pending)
    }
}

/// How the rider handed the collection in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Physical cash
    Cash,
    /// UPI transfer
    Upi,
    /// Bank transfer
    BankTransfer,
    /// Part cash, part digital
    Mixed,
}

/// Status flag written back on the collection record once reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStatus {
    /// Full expected amount (or more) handed in
    Collected,
    /// Less than the expected amount handed in
    PartiallyCollected,
}

/// A single cash-collection attempt against a runsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionAttempt {
    /// Unique identifier for the attempt
    pub id: String,
    /// Runsheet the cash was collected for
    pub runsheet_id: String,
    /// Reconciliation of collected against expected
    pub result: ReconciliationResult,
    /// How the amount was handed in
    pub payment_method: PaymentMethod,
    /// Transaction reference (UPI id, receipt number)
    pub reference: Option<String>,
    /// Operator-supplied reason when the count does not match
    pub discrepancy_reason: Option<String>,
    /// Operator notes recorded at verification or rejection
    pub verification_notes: Option<String>,
    /// Where the attempt sits in the verification workflow
    pub status: AttemptStatus,
    /// When the attempt was recorded
    pub created_at: NaiveDateTime,
    /// When the attempt reached a terminal state
    pub resolved_at: Option<NaiveDateTime>,
}

impl CollectionAttempt {
    /// Record a new pending attempt from a reconciliation result
    pub fn new(
        runsheet_id: String,
        result: ReconciliationResult,
        payment_method: PaymentMethod,
        reference: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            runsheet_id,
            result,
            payment_method,
            reference,
            discrepancy_reason: None,
            verification_notes: None,
            status: AttemptStatus::Pending,
            created_at: chrono::Utc::now().naive_utc(),
            resolved_at: None,
        }
    }

    /// Attach operator notes to the attempt
    pub fn with_notes(mut self, notes: String) -> Self {
        self.verification_notes = Some(notes);
        self
    }

    /// Verify the attempt
    ///
    /// A non-matched reconciliation requires a discrepancy reason; without
    /// one the submission is incomplete and the attempt stays pending.
    pub fn verify(&mut self, discrepancy_reason: Option<String>) -> RunsheetResult<()> {
        if self.status.is_terminal() {
            return Err(RunsheetError::InvalidTransition(format!(
                "Collection attempt '{}' is already {:?}",
                self.id, self.status
            )));
        }

        if self.result.outcome.requires_justification() {
            match discrepancy_reason {
                Some(reason) if !reason.trim().is_empty() => {
                    self.discrepancy_reason = Some(reason);
                }
                _ => {
                    return Err(RunsheetError::Validation(format!(
                        "Discrepancy reason required: expected {} but collected {}",
                        self.result.expected, self.result.collected
                    )));
                }
            }
        }

        self.status = AttemptStatus::Verified;
        self.resolved_at = Some(chrono::Utc::now().naive_utc());

        Ok(())
    }

    /// Reject the attempt with an operator note
    pub fn reject(&mut self, note: String) -> RunsheetResult<()> {
        if self.status.is_terminal() {
            return Err(RunsheetError::InvalidTransition(format!(
                "Collection attempt '{}' is already {:?}",
                self.id, self.status
            )));
        }

        if note.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Rejection requires a note".to_string(),
            ));
        }

        self.verification_notes = Some(note);
        self.status = AttemptStatus::Rejected;
        self.resolved_at = Some(chrono::Utc::now().naive_utc());

        Ok(())
    }

    /// Status flag for the collection record: only a shortfall counts as
    /// partially collected
    pub fn collection_status(&self) -> CollectionStatus {
        if self.result.difference < BigDecimal::from(0) {
            CollectionStatus::PartiallyCollected
        } else {
            CollectionStatus::Collected
        }
    }
}

/// Collection manager for recording and verifying cash hand-ins
pub struct CollectionManager<S: RunsheetStorage> {
    pub(crate) storage: S,
    reconciler: Reconciler,
    validator: Box<dyn CollectionValidator>,
}

impl<S: RunsheetStorage> CollectionManager<S> {
    /// Create a new collection manager with an exact-match reconciler
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            reconciler: Reconciler::exact(),
            validator: Box::new(DefaultCollectionValidator),
        }
    }

    /// Create a collection manager with a configured reconciler
    pub fn with_reconciler(storage: S, reconciler: Reconciler) -> Self {
        Self {
            storage,
            reconciler,
            validator: Box::new(DefaultCollectionValidator),
        }
    }

    /// Create a collection manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn CollectionValidator>) -> Self {
        Self {
            storage,
            reconciler: Reconciler::exact(),
            validator,
        }
    }

    /// Record a new pending collection attempt
    pub async fn record_attempt(
        &mut self,
        runsheet_id: &str,
        expected: BigDecimal,
        collected: BigDecimal,
        payment_method: PaymentMethod,
        reference: Option<String>,
    ) -> RunsheetResult<CollectionAttempt> {
        let result = self.reconciler.evaluate(expected, collected)?;
        let attempt = CollectionAttempt::new(
            runsheet_id.to_string(),
            result,
            payment_method,
            reference,
        );

        self.validator.validate_collection(&attempt)?;
        self.storage.save_collection(&attempt).await?;

        Ok(attempt)
    }

    /// Get a collection attempt by ID
    pub async fn get_attempt(&self, attempt_id: &str) -> RunsheetResult<Option<CollectionAttempt>> {
        self.storage.get_collection(attempt_id).await
    }

    /// Get a collection attempt by ID, returning an error if not found
    pub async fn get_attempt_required(
        &self,
        attempt_id: &str,
    ) -> RunsheetResult<CollectionAttempt> {
        self.storage
            .get_collection(attempt_id)
            .await?
            .ok_or_else(|| RunsheetError::CollectionNotFound(attempt_id.to_string()))
    }

    /// Verify a pending attempt
    pub async fn verify_attempt(
        &mut self,
        attempt_id: &str,
        discrepancy_reason: Option<String>,
    ) -> RunsheetResult<CollectionAttempt> {
        let mut attempt = self.get_attempt_required(attempt_id).await?;
        attempt.verify(discrepancy_reason)?;
        self.storage.update_collection(&attempt).await?;
        Ok(attempt)
    }

    /// Reject a pending attempt
    pub async fn reject_attempt(
        &mut self,
        attempt_id: &str,
        note: String,
    ) -> RunsheetResult<CollectionAttempt> {
        let mut attempt = self.get_attempt_required(attempt_id).await?;
        attempt.reject(note)?;
        self.storage.update_collection(&attempt).await?;
        Ok(attempt)
    }

    /// List all attempts recorded against a runsheet
    pub async fn list_for_runsheet(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<Vec<CollectionAttempt>> {
        self.storage.list_runsheet_collections(runsheet_id).await
    }

    /// Find the verified attempt for a runsheet, if any
    pub async fn verified_attempt(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<Option<CollectionAttempt>> {
        let attempts = self.list_for_runsheet(runsheet_id).await?;
        Ok(attempts
            .into_iter()
            .find(|a| a.status == AttemptStatus::Verified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::ReconciliationOutcome;

    fn attempt_for(expected: i64, collected: i64) -> CollectionAttempt {
        let result = ReconciliationResult::evaluate(
            BigDecimal::from(expected),
            BigDecimal::from(collected),
        )
        .unwrap();
        CollectionAttempt::new("RS-2025-001".to_string(), result, PaymentMethod::Cash, None)
    }

    #[test]
    fn test_matched_attempt_verifies_without_reason() {
        let mut attempt = attempt_for(32400, 32400);
        assert_eq!(attempt.status, AttemptStatus::Pending);

        attempt.verify(None).unwrap();
        assert_eq!(attempt.status, AttemptStatus::Verified);
        assert!(attempt.resolved_at.is_some());
        assert_eq!(attempt.collection_status(), CollectionStatus::Collected);
    }

    #[test]
    fn test_shortfall_requires_discrepancy_reason() {
        let mut attempt = attempt_for(32400, 31000);
        assert_eq!(attempt.result.outcome, ReconciliationOutcome::Shortfall);

        // missing reason blocks verification and leaves the attempt pending
        assert!(attempt.verify(None).is_err());
        assert_eq!(attempt.status, AttemptStatus::Pending);

        // a blank reason is no reason
        assert!(attempt.verify(Some("   ".to_string())).is_err());

        attempt
            .verify(Some("Customer refused one order, cash returned".to_string()))
            .unwrap();
        assert_eq!(attempt.status, AttemptStatus::Verified);
        assert_eq!(
            attempt.collection_status(),
            CollectionStatus::PartiallyCollected
        );
    }

    #[test]
    fn test_excess_also_requires_reason() {
        let mut attempt = attempt_for(1000, 1100);
        assert!(attempt.verify(None).is_err());
        attempt
            .verify(Some("Customer had no change, to be refunded".to_string()))
            .unwrap();
        // excess still reads as collected on the record
        assert_eq!(attempt.collection_status(), CollectionStatus::Collected);
    }

    #[test]
    fn test_terminal_attempts_are_immutable() {
        let mut verified = attempt_for(500, 500);
        verified.verify(None).unwrap();
        assert!(verified.verify(None).is_err());
        assert!(verified.reject("late note".to_string()).is_err());

        let mut rejected = attempt_for(500, 500);
        rejected.reject("Recount ordered".to_string()).unwrap();
        assert_eq!(rejected.status, AttemptStatus::Rejected);
        assert!(rejected.verify(None).is_err());
    }

    #[test]
    fn test_reject_requires_note() {
        let mut attempt = attempt_for(500, 480);
        assert!(attempt.reject("".to_string()).is_err());
        assert_eq!(attempt.status, AttemptStatus::Pending);

        attempt.reject("Torn notes in the bundle".to_string()).unwrap();
        assert_eq!(
            attempt.verification_notes.as_deref(),
            Some("Torn notes in the bundle")
        );
    }
}
