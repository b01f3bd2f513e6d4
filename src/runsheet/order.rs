//! Order management functionality

use crate::traits::*;
use crate::types::*;

/// Order manager for warehouse and dispatch operations
pub struct OrderManager<S: RunsheetStorage> {
    pub(crate) storage: S,
    validator: Box<dyn OrderValidator>,
}

impl<S: RunsheetStorage> OrderManager<S> {
    /// Create a new order manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultOrderValidator),
        }
    }

    /// Create a new order manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn OrderValidator>) -> Self {
        Self { storage, validator }
    }

    /// Register a new order
    pub async fn create_order(&mut self, order: Order) -> RunsheetResult<Order> {
        self.validator.validate_order(&order)?;

        if self.storage.get_order(&order.id).await?.is_some() {
            return Err(RunsheetError::Validation(format!(
                "Order with ID '{}' already exists",
                order.id
            )));
        }

        self.storage.save_order(&order).await?;

        Ok(order)
    }

    /// Get an order by ID
    pub async fn get_order(&self, order_id: &str) -> RunsheetResult<Option<Order>> {
        self.storage.get_order(order_id).await
    }

    /// Get an order by ID, returning an error if not found
    pub async fn get_order_required(&self, order_id: &str) -> RunsheetResult<Order> {
        self.storage
            .get_order(order_id)
            .await?
            .ok_or_else(|| RunsheetError::OrderNotFound(order_id.to_string()))
    }

    /// List all orders
    pub async fn list_orders(&self) -> RunsheetResult<Vec<Order>> {
        self.storage.list_orders(None).await
    }

    /// List orders by status
    pub async fn list_orders_by_status(&self, status: OrderStatus) -> RunsheetResult<Vec<Order>> {
        self.storage.list_orders(Some(status)).await
    }

    /// List orders for a delivery zone
    pub async fn list_orders_by_zone(&self, zone: &str) -> RunsheetResult<Vec<Order>> {
        let orders = self.storage.list_orders(None).await?;
        Ok(orders.into_iter().filter(|o| o.zone == zone).collect())
    }

    /// Move an order to the next status, enforcing the fulfilment pipeline
    pub async fn update_status(
        &mut self,
        order_id: &str,
        next: OrderStatus,
    ) -> RunsheetResult<Order> {
        let mut order = self.get_order_required(order_id).await?;

        if !order.status.can_transition_to(next) {
            return Err(RunsheetError::InvalidTransition(format!(
                "Order '{}' cannot move from {:?} to {:?}",
                order.id, order.status, next
            )));
        }

        order.status = next;
        order.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_order(&order).await?;

        Ok(order)
    }
}
