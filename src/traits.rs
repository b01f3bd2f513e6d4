//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::runsheet::collection::CollectionAttempt;
use crate::types::*;

/// Storage abstraction for the runsheet system
///
/// This trait allows the core to work with any storage backend
/// (PostgreSQL, a hosted service, in-memory, etc.) by implementing these
/// methods. The core never reaches for ambient data; everything flows
/// through an injected implementation.
#[async_trait]
pub trait RunsheetStorage: Send + Sync {
    /// Save an order to storage
    async fn save_order(&mut self, order: &Order) -> RunsheetResult<()>;

    /// Get an order by ID
    async fn get_order(&self, order_id: &str) -> RunsheetResult<Option<Order>>;

    /// List all orders, optionally filtered by status
    async fn list_orders(&self, status: Option<OrderStatus>) -> RunsheetResult<Vec<Order>>;

    /// Update an order
    async fn update_order(&mut self, order: &Order) -> RunsheetResult<()>;

    /// Save a runsheet to storage
    async fn save_runsheet(&mut self, runsheet: &Runsheet) -> RunsheetResult<()>;

    /// Get a runsheet by ID
    async fn get_runsheet(&self, runsheet_id: &str) -> RunsheetResult<Option<Runsheet>>;

    /// List all runsheets, optionally filtered by status
    async fn list_runsheets(
        &self,
        status: Option<RunsheetStatus>,
    ) -> RunsheetResult<Vec<Runsheet>>;

    /// Update a runsheet
    async fn update_runsheet(&mut self, runsheet: &Runsheet) -> RunsheetResult<()>;

    /// Save a collection attempt to storage
    async fn save_collection(&mut self, attempt: &CollectionAttempt) -> RunsheetResult<()>;

    /// Get a collection attempt by ID
    async fn get_collection(&self, attempt_id: &str) -> RunsheetResult<Option<CollectionAttempt>>;

    /// Update a collection attempt
    async fn update_collection(&mut self, attempt: &CollectionAttempt) -> RunsheetResult<()>;

    /// List all collection attempts recorded against a runsheet
    async fn list_runsheet_collections(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<Vec<CollectionAttempt>>;
}

/// Trait for implementing custom order validation rules
pub trait OrderValidator: Send + Sync {
    /// Validate an order before saving
    fn validate_order(&self, order: &Order) -> RunsheetResult<()>;
}

/// Trait for implementing custom collection validation rules
pub trait CollectionValidator: Send + Sync {
    /// Validate a collection attempt before saving
    fn validate_collection(&self, attempt: &CollectionAttempt) -> RunsheetResult<()>;
}

/// Default order validator with basic rules
pub struct DefaultOrderValidator;

impl OrderValidator for DefaultOrderValidator {
    fn validate_order(&self, order: &Order) -> RunsheetResult<()> {
        order.validate()
    }
}

/// Default collection validator with basic rules
pub struct DefaultCollectionValidator;

impl CollectionValidator for DefaultCollectionValidator {
    fn validate_collection(&self, attempt: &CollectionAttempt) -> RunsheetResult<()> {
        if attempt.runsheet_id.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Collection must reference a runsheet".to_string(),
            ));
        }

        Ok(())
    }
}
