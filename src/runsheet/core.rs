//! Dispatch orchestrator that coordinates orders, runsheets, and collections

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconciliation::Reconciler;
use crate::runsheet::{CollectionAttempt, CollectionManager, OrderManager, PaymentMethod};
use crate::traits::*;
use crate::types::*;

/// Main dispatch system that orchestrates runsheet operations
pub struct Dispatcher<S: RunsheetStorage> {
    order_manager: OrderManager<S>,
    collection_manager: CollectionManager<S>,
    storage: S,
}

impl<S: RunsheetStorage + Clone> Dispatcher<S> {
    /// Create a new dispatcher with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            order_manager: OrderManager::new(storage.clone()),
            collection_manager: CollectionManager::new(storage.clone()),
            storage,
        }
    }

    /// Create a dispatcher with a configured reconciler
    pub fn with_reconciler(storage: S, reconciler: Reconciler) -> Self {
        Self {
            order_manager: OrderManager::new(storage.clone()),
            collection_manager: CollectionManager::with_reconciler(storage.clone(), reconciler),
            storage,
        }
    }

    /// Create a dispatcher with custom validators
    pub fn with_validators(
        storage: S,
        order_validator: Box<dyn OrderValidator>,
        collection_validator: Box<dyn CollectionValidator>,
    ) -> Self {
        Self {
            order_manager: OrderManager::with_validator(storage.clone(), order_validator),
            collection_manager: CollectionManager::with_validator(
                storage.clone(),
                collection_validator,
            ),
            storage,
        }
    }

    // Order operations
    /// Register a new order
    pub async fn create_order(&mut self, order: Order) -> RunsheetResult<Order> {
        self.order_manager.create_order(order).await
    }

    /// Get an order by ID
    pub async fn get_order(&self, order_id: &str) -> RunsheetResult<Option<Order>> {
        self.order_manager.get_order(order_id).await
    }

    /// List all orders
    pub async fn list_orders(&self) -> RunsheetResult<Vec<Order>> {
        self.order_manager.list_orders().await
    }

    /// List orders by status
    pub async fn list_orders_by_status(&self, status: OrderStatus) -> RunsheetResult<Vec<Order>> {
        self.order_manager.list_orders_by_status(status).await
    }

    /// Move an order along the fulfilment pipeline
    pub async fn update_order_status(
        &mut self,
        order_id: &str,
        next: OrderStatus,
    ) -> RunsheetResult<Order> {
        self.order_manager.update_status(order_id, next).await
    }

    /// Mark an order delivered
    pub async fn mark_delivered(&mut self, order_id: &str) -> RunsheetResult<Order> {
        self.order_manager
            .update_status(order_id, OrderStatus::Delivered)
            .await
    }

    /// Mark a delivery attempt failed
    pub async fn mark_failed(&mut self, order_id: &str) -> RunsheetResult<Order> {
        self.order_manager
            .update_status(order_id, OrderStatus::Failed)
            .await
    }

    // Runsheet operations
    /// Create a new runsheet for a rider
    pub async fn create_runsheet(
        &mut self,
        id: String,
        rider_id: String,
        rider_name: String,
        run_date: NaiveDate,
        zone: String,
    ) -> RunsheetResult<Runsheet> {
        if self.storage.get_runsheet(&id).await?.is_some() {
            return Err(RunsheetError::Validation(format!(
                "Runsheet with ID '{}' already exists",
                id
            )));
        }

        let runsheet = Runsheet::new(id, rider_id, rider_name, run_date, zone);
        self.storage.save_runsheet(&runsheet).await?;

        Ok(runsheet)
    }

    /// Get a runsheet by ID
    pub async fn get_runsheet(&self, runsheet_id: &str) -> RunsheetResult<Option<Runsheet>> {
        self.storage.get_runsheet(runsheet_id).await
    }

    /// Get a runsheet by ID, returning an error if not found
    pub async fn get_runsheet_required(&self, runsheet_id: &str) -> RunsheetResult<Runsheet> {
        self.storage
            .get_runsheet(runsheet_id)
            .await?
            .ok_or_else(|| RunsheetError::RunsheetNotFound(runsheet_id.to_string()))
    }

    /// List all runsheets, optionally by status
    pub async fn list_runsheets(
        &self,
        status: Option<RunsheetStatus>,
    ) -> RunsheetResult<Vec<Runsheet>> {
        self.storage.list_runsheets(status).await
    }

    /// Assign a packed order to a runsheet
    pub async fn assign_order(
        &mut self,
        runsheet_id: &str,
        order_id: &str,
    ) -> RunsheetResult<Runsheet> {
        let mut runsheet = self.get_runsheet_required(runsheet_id).await?;

        if runsheet.status != RunsheetStatus::Created {
            return Err(RunsheetError::InvalidTransition(format!(
                "Orders can only be assigned while runsheet '{}' is in Created status",
                runsheet.id
            )));
        }

        if runsheet.order_ids.iter().any(|id| id == order_id) {
            return Err(RunsheetError::Validation(format!(
                "Order '{}' is already on runsheet '{}'",
                order_id, runsheet.id
            )));
        }

        let order = self.order_manager.get_order_required(order_id).await?;
        if order.status != OrderStatus::Packed {
            return Err(RunsheetError::InvalidTransition(format!(
                "Order '{}' must be Packed before assignment, found {:?}",
                order.id, order.status
            )));
        }

        runsheet.assign_order(order.id);
        self.storage.update_runsheet(&runsheet).await?;

        Ok(runsheet)
    }

    /// Send a runsheet out: the rider departs and every assigned order is
    /// dispatched
    pub async fn dispatch_runsheet(&mut self, runsheet_id: &str) -> RunsheetResult<Runsheet> {
        let mut runsheet = self.get_runsheet_required(runsheet_id).await?;

        if runsheet.status != RunsheetStatus::Created {
            return Err(RunsheetError::InvalidTransition(format!(
                "Runsheet '{}' cannot be dispatched from {:?}",
                runsheet.id, runsheet.status
            )));
        }

        if runsheet.order_ids.is_empty() {
            return Err(RunsheetError::Validation(format!(
                "Runsheet '{}' has no orders assigned",
                runsheet.id
            )));
        }

        for order_id in runsheet.order_ids.clone() {
            self.order_manager
                .update_status(&order_id, OrderStatus::Dispatched)
                .await?;
        }

        runsheet.status = RunsheetStatus::InTransit;
        runsheet.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_runsheet(&runsheet).await?;

        Ok(runsheet)
    }

    // Collection and reconciliation operations
    /// Expected COD for a runsheet: the sum of COD-mode order totals
    ///
    /// Computed on demand from the assigned orders, never persisted.
    pub async fn expected_cod(&self, runsheet_id: &str) -> RunsheetResult<BigDecimal> {
        let summary = self.collection_summary(runsheet_id).await?;
        Ok(summary.expected_cod)
    }

    /// Expected money split by payment mode for a runsheet
    pub async fn collection_summary(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<CollectionSummary> {
        let orders = self.runsheet_orders(runsheet_id).await?;

        let expected_cod: BigDecimal = orders
            .iter()
            .filter(|o| o.payment_mode == PaymentMode::Cod)
            .map(|o| &o.total_amount)
            .sum();
        let prepaid_total: BigDecimal = orders
            .iter()
            .filter(|o| o.payment_mode == PaymentMode::Online)
            .map(|o| &o.total_amount)
            .sum();
        let grand_total = &expected_cod + &prepaid_total;

        Ok(CollectionSummary {
            expected_cod,
            prepaid_total,
            grand_total,
        })
    }

    /// Delivery progress for a runsheet
    pub async fn delivery_summary(&self, runsheet_id: &str) -> RunsheetResult<DeliverySummary> {
        let orders = self.runsheet_orders(runsheet_id).await?;
        let delivered = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count();
        Ok(DeliverySummary::from_counts(orders.len(), delivered))
    }

    /// Record a cash hand-in for a runsheet as a pending collection attempt
    ///
    /// The expected amount is computed from the runsheet's COD orders at the
    /// moment of recording.
    pub async fn record_collection(
        &mut self,
        runsheet_id: &str,
        collected: BigDecimal,
        payment_method: PaymentMethod,
        reference: Option<String>,
    ) -> RunsheetResult<CollectionAttempt> {
        let runsheet = self.get_runsheet_required(runsheet_id).await?;

        if runsheet.status != RunsheetStatus::InTransit {
            return Err(RunsheetError::InvalidTransition(format!(
                "Collections can only be recorded while runsheet '{}' is in transit",
                runsheet.id
            )));
        }

        let expected = self.expected_cod(runsheet_id).await?;

        self.collection_manager
            .record_attempt(runsheet_id, expected, collected, payment_method, reference)
            .await
    }

    /// Verify a pending collection attempt
    pub async fn verify_collection(
        &mut self,
        attempt_id: &str,
        discrepancy_reason: Option<String>,
    ) -> RunsheetResult<CollectionAttempt> {
        self.collection_manager
            .verify_attempt(attempt_id, discrepancy_reason)
            .await
    }

    /// Reject a pending collection attempt
    pub async fn reject_collection(
        &mut self,
        attempt_id: &str,
        note: String,
    ) -> RunsheetResult<CollectionAttempt> {
        self.collection_manager.reject_attempt(attempt_id, note).await
    }

    /// List collection attempts recorded against a runsheet
    pub async fn list_collections(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<Vec<CollectionAttempt>> {
        self.collection_manager.list_for_runsheet(runsheet_id).await
    }

    /// Close a runsheet
    ///
    /// Only an in-transit runsheet with a verified collection attempt can
    /// close. Stamps both the close request and the close itself.
    pub async fn close_runsheet(&mut self, runsheet_id: &str) -> RunsheetResult<Runsheet> {
        let mut runsheet = self.get_runsheet_required(runsheet_id).await?;

        if runsheet.status != RunsheetStatus::InTransit {
            return Err(RunsheetError::InvalidTransition(format!(
                "Runsheet '{}' cannot close from {:?}",
                runsheet.id, runsheet.status
            )));
        }

        if self
            .collection_manager
            .verified_attempt(runsheet_id)
            .await?
            .is_none()
        {
            return Err(RunsheetError::Validation(format!(
                "Runsheet '{}' has no verified collection",
                runsheet.id
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        runsheet.status = RunsheetStatus::Closed;
        runsheet.close_requested_at = Some(now);
        runsheet.closed_at = Some(now);
        runsheet.updated_at = now;
        self.storage.update_runsheet(&runsheet).await?;

        Ok(runsheet)
    }

    /// Pre-close report: what still stands between this runsheet and a clean
    /// close
    pub async fn close_report(&self, runsheet_id: &str) -> RunsheetResult<RunsheetCloseReport> {
        let runsheet = self.get_runsheet_required(runsheet_id).await?;
        let delivery = self.delivery_summary(runsheet_id).await?;
        let collection = self.collection_summary(runsheet_id).await?;
        let verified = self
            .collection_manager
            .verified_attempt(runsheet_id)
            .await?;

        let mut issues = Vec::new();

        if runsheet.status != RunsheetStatus::InTransit {
            issues.push(format!(
                "Runsheet is {:?}, only in-transit runsheets can close",
                runsheet.status
            ));
        }

        let undelivered = delivery.total_orders - delivery.delivered_orders;
        if undelivered > 0 {
            issues.push(format!("{} orders not yet delivered", undelivered));
        }

        if verified.is_none() {
            issues.push("No verified collection attempt".to_string());
        }

        Ok(RunsheetCloseReport {
            runsheet_id: runsheet.id,
            can_close: runsheet.status == RunsheetStatus::InTransit && verified.is_some(),
            delivery,
            collection,
            verified_attempt_id: verified.map(|a| a.id),
            issues,
        })
    }

    async fn runsheet_orders(&self, runsheet_id: &str) -> RunsheetResult<Vec<Order>> {
        let runsheet = self.get_runsheet_required(runsheet_id).await?;
        let mut orders = Vec::with_capacity(runsheet.order_ids.len());
        for order_id in &runsheet.order_ids {
            orders.push(self.order_manager.get_order_required(order_id).await?);
        }
        Ok(orders)
    }
}

/// Report on a runsheet's readiness to close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunsheetCloseReport {
    pub runsheet_id: String,
    pub can_close: bool,
    pub delivery: DeliverySummary,
    pub collection: CollectionSummary,
    pub verified_attempt_id: Option<String>,
    pub issues: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn cod_order(id: &str, amount: i64) -> Order {
        let mut order = Order::new(
            id.to_string(),
            format!("ORD-20250110-{}", id),
            "Priya Sharma".to_string(),
            "+91 98765 43211".to_string(),
            "456, DLF Phase 2, Gurugram".to_string(),
            "Zone A".to_string(),
            PaymentMode::Cod,
            "11:00 AM - 1:00 PM".to_string(),
        );
        order.total_amount = BigDecimal::from(amount);
        order.status = OrderStatus::Packed;
        order
    }

    #[tokio::test]
    async fn test_dispatch_and_close_workflow() {
        let storage = MemoryStorage::new();
        let mut dispatcher = Dispatcher::new(storage);

        dispatcher.create_order(cod_order("ORD001", 330)).await.unwrap();
        dispatcher.create_order(cod_order("ORD002", 670)).await.unwrap();

        let runsheet = dispatcher
            .create_runsheet(
                "RS-2025-001".to_string(),
                "R001".to_string(),
                "Suresh Kumar".to_string(),
                chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                "Zone A".to_string(),
            )
            .await
            .unwrap();

        dispatcher.assign_order(&runsheet.id, "ORD001").await.unwrap();
        dispatcher.assign_order(&runsheet.id, "ORD002").await.unwrap();
        dispatcher.dispatch_runsheet(&runsheet.id).await.unwrap();

        let expected = dispatcher.expected_cod(&runsheet.id).await.unwrap();
        assert_eq!(expected, BigDecimal::from(1000));

        dispatcher.mark_delivered("ORD001").await.unwrap();
        dispatcher.mark_delivered("ORD002").await.unwrap();

        // closing before any collection is blocked
        assert!(dispatcher.close_runsheet(&runsheet.id).await.is_err());

        let attempt = dispatcher
            .record_collection(
                &runsheet.id,
                BigDecimal::from(1000),
                PaymentMethod::Cash,
                None,
            )
            .await
            .unwrap();

        dispatcher.verify_collection(&attempt.id, None).await.unwrap();

        let closed = dispatcher.close_runsheet(&runsheet.id).await.unwrap();
        assert_eq!(closed.status, RunsheetStatus::Closed);
        assert!(closed.closed_at.is_some());
    }

    #[tokio::test]
    async fn test_assignment_rules() {
        let storage = MemoryStorage::new();
        let mut dispatcher = Dispatcher::new(storage);

        let mut unpacked = cod_order("ORD010", 200);
        unpacked.status = OrderStatus::Placed;
        dispatcher.create_order(unpacked).await.unwrap();
        dispatcher.create_order(cod_order("ORD011", 400)).await.unwrap();

        dispatcher
            .create_runsheet(
                "RS-2025-002".to_string(),
                "R002".to_string(),
                "Amit Patel".to_string(),
                chrono::NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(),
                "Zone B".to_string(),
            )
            .await
            .unwrap();

        // only packed orders can board a runsheet
        assert!(dispatcher.assign_order("RS-2025-002", "ORD010").await.is_err());
        dispatcher.assign_order("RS-2025-002", "ORD011").await.unwrap();

        // no double assignment
        assert!(dispatcher.assign_order("RS-2025-002", "ORD011").await.is_err());

        // no dispatching somebody else's runsheet id
        assert!(dispatcher.dispatch_runsheet("RS-9999").await.is_err());
    }
}
