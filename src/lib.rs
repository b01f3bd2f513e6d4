//! # Runsheet Core
//!
//! A delivery-operations library providing runsheet management, order
//! tracking, and cash-on-delivery reconciliation for farm-produce delivery.
//!
//! ## Features
//!
//! - **COD reconciliation**: classify collected cash against the expected
//!   amount with signed differences and an optional tolerance band
//! - **Collection verification**: pending/verified/rejected attempt workflow
//!   with mandatory discrepancy justification
//! - **Runsheet lifecycle**: create, assign, dispatch, and close delivery
//!   runs with verification-gated closing
//! - **Order management**: fulfilment pipeline with enforced status
//!   transitions
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use runsheet_core::{ReconciliationOutcome, ReconciliationResult};
//! use bigdecimal::BigDecimal;
//!
//! let result = ReconciliationResult::evaluate(
//!     BigDecimal::from(32400),
//!     BigDecimal::from(32400),
//! ).unwrap();
//! assert_eq!(result.outcome, ReconciliationOutcome::Matched);
//! ```

pub mod reconciliation;
pub mod runsheet;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use runsheet::*;
pub use traits::*;
pub use types::*;
