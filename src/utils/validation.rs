//! Validation utilities

use crate::runsheet::collection::CollectionAttempt;
use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that a monetary amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> RunsheetResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(RunsheetError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an order ID is valid
pub fn validate_order_id(order_id: &str) -> RunsheetResult<()> {
    if order_id.trim().is_empty() {
        return Err(RunsheetError::Validation(
            "Order ID cannot be empty".to_string(),
        ));
    }

    if order_id.len() > 50 {
        return Err(RunsheetError::Validation(
            "Order ID cannot exceed 50 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !order_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RunsheetError::Validation(
            "Order ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that a runsheet ID is valid
pub fn validate_runsheet_id(runsheet_id: &str) -> RunsheetResult<()> {
    if runsheet_id.trim().is_empty() {
        return Err(RunsheetError::Validation(
            "Runsheet ID cannot be empty".to_string(),
        ));
    }

    if runsheet_id.len() > 50 {
        return Err(RunsheetError::Validation(
            "Runsheet ID cannot exceed 50 characters".to_string(),
        ));
    }

    if !runsheet_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RunsheetError::Validation(
            "Runsheet ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate an operator note or discrepancy reason
pub fn validate_note(note: &str) -> RunsheetResult<()> {
    if note.trim().is_empty() {
        return Err(RunsheetError::Validation(
            "Note cannot be empty".to_string(),
        ));
    }

    if note.len() > 500 {
        return Err(RunsheetError::Validation(
            "Note cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced order validator with detailed checks
pub struct EnhancedOrderValidator;

impl OrderValidator for EnhancedOrderValidator {
    fn validate_order(&self, order: &Order) -> RunsheetResult<()> {
        // Basic validation
        order.validate()?;

        // Enhanced validations
        validate_order_id(&order.id)?;
        validate_non_negative_amount(&order.total_amount)?;

        if order.customer_name.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Customer name cannot be empty".to_string(),
            ));
        }

        if order.zone.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Delivery zone cannot be empty".to_string(),
            ));
        }

        // Check for duplicate line items on the same product
        let mut seen_products = std::collections::HashSet::new();
        for item in &order.items {
            if !seen_products.insert(&item.product_id) {
                return Err(RunsheetError::Validation(format!(
                    "Product '{}' appears multiple times in order",
                    item.product_id
                )));
            }
        }

        Ok(())
    }
}

/// Enhanced collection validator with detailed checks
pub struct EnhancedCollectionValidator;

impl CollectionValidator for EnhancedCollectionValidator {
    fn validate_collection(&self, attempt: &CollectionAttempt) -> RunsheetResult<()> {
        validate_runsheet_id(&attempt.runsheet_id)?;
        validate_non_negative_amount(&attempt.result.expected)?;
        validate_non_negative_amount(&attempt.result.collected)?;

        if let Some(reference) = &attempt.reference {
            if reference.len() > 100 {
                return Err(RunsheetError::Validation(
                    "Transaction reference cannot exceed 100 characters".to_string(),
                ));
            }
        }

        if let Some(reason) = &attempt.discrepancy_reason {
            validate_note(reason)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_rules() {
        assert!(validate_order_id("ORD-20251010-0001").is_ok());
        assert!(validate_order_id("").is_err());
        assert!(validate_order_id("ORD 001").is_err());
        assert!(validate_runsheet_id("RS-2025-001").is_ok());
        assert!(validate_runsheet_id("RS/2025").is_err());
    }

    #[test]
    fn test_amount_rule() {
        assert!(validate_non_negative_amount(&BigDecimal::from(0)).is_ok());
        assert!(validate_non_negative_amount(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_note_rules() {
        assert!(validate_note("Customer refused one order").is_ok());
        assert!(validate_note("  ").is_err());
        assert!(validate_note(&"x".repeat(501)).is_err());
    }
}
