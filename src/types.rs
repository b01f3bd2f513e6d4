//! Core types and data structures for the delivery operations system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reconciliation::ReconciliationError;

/// Payment mode for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Cash on delivery - collected by the rider at drop-off
    #[serde(rename = "COD")]
    Cod,
    /// Prepaid online payment
    Online,
}

/// Order fulfilment statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order placed by the customer
    Placed,
    /// Order accepted by the warehouse
    Accepted,
    /// Items picked and packed
    Packed,
    /// Out for delivery on a runsheet
    Dispatched,
    /// Handed over to the customer
    Delivered,
    /// Cancelled before dispatch
    Cancelled,
    /// Returned after delivery or a failed handover
    Returned,
    /// Delivery attempt failed
    Failed,
}

impl OrderStatus {
    /// Whether no further fulfilment work can happen on this order
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Returned | OrderStatus::Failed
        )
    }

    /// Returns whether a transition from this status to `next` is allowed
    /// by the fulfilment pipeline
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, Accepted)
                | (Placed, Cancelled)
                | (Accepted, Packed)
                | (Accepted, Cancelled)
                | (Packed, Dispatched)
                | (Packed, Cancelled)
                | (Dispatched, Delivered)
                | (Dispatched, Failed)
                | (Dispatched, Returned)
                | (Delivered, Returned)
        )
    }
}

/// Single line item within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique identifier for the line item
    pub id: String,
    /// Product being ordered
    pub product_id: String,
    /// Product name as shown on the picklist
    pub product_name: String,
    /// Quantity ordered (kg, dozen, bundles - the unit lives on the product)
    pub quantity: BigDecimal,
    /// Unit price at order time
    pub price: BigDecimal,
    /// Line subtotal (quantity * price)
    pub subtotal: BigDecimal,
    /// Whether the item was substituted during pick and pack
    pub is_substituted: bool,
    /// Product id of the substitute, if any
    pub substituted_with: Option<String>,
}

impl OrderItem {
    /// Create a new line item with the subtotal computed from quantity and price
    pub fn new(
        id: String,
        product_id: String,
        product_name: String,
        quantity: BigDecimal,
        price: BigDecimal,
    ) -> Self {
        let subtotal = &quantity * &price;
        Self {
            id,
            product_id,
            product_name,
            quantity,
            price,
            subtotal,
            is_substituted: false,
            substituted_with: None,
        }
    }

    /// Mark the item as substituted with another product
    pub fn substitute(&mut self, product_id: String) {
        self.is_substituted = true;
        self.substituted_with = Some(product_id);
    }
}

/// Customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for the order
    pub id: String,
    /// Human-facing order number (e.g. ORD-20251010-0001)
    pub order_number: String,
    /// Customer name
    pub customer_name: String,
    /// Customer contact number
    pub customer_phone: String,
    /// Delivery address
    pub address: String,
    /// Delivery zone used for runsheet routing
    pub zone: String,
    /// Order total
    pub total_amount: BigDecimal,
    /// How the order is paid
    pub payment_mode: PaymentMode,
    /// Current fulfilment status
    pub status: OrderStatus,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Delivery slot label (e.g. "11:00 AM - 1:00 PM")
    pub delivery_slot: String,
    /// Optional delivery instructions
    pub notes: Option<String>,
    /// When the order was created
    pub created_at: NaiveDateTime,
    /// When the order was last updated
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Create a new order in `Placed` status with no items
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        order_number: String,
        customer_name: String,
        customer_phone: String,
        address: String,
        zone: String,
        payment_mode: PaymentMode,
        delivery_slot: String,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            order_number,
            customer_name,
            customer_phone,
            address,
            zone,
            total_amount: BigDecimal::from(0),
            payment_mode,
            status: OrderStatus::Placed,
            items: Vec::new(),
            delivery_slot,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a line item and fold it into the order total
    pub fn add_item(&mut self, item: OrderItem) {
        self.total_amount += &item.subtotal;
        self.items.push(item);
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Sum of all line-item subtotals
    pub fn items_total(&self) -> BigDecimal {
        self.items.iter().map(|i| &i.subtotal).sum()
    }

    /// Validate the order
    pub fn validate(&self) -> RunsheetResult<()> {
        if self.id.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Order ID cannot be empty".to_string(),
            ));
        }

        if self.order_number.trim().is_empty() {
            return Err(RunsheetError::Validation(
                "Order number cannot be empty".to_string(),
            ));
        }

        if self.total_amount < BigDecimal::from(0) {
            return Err(RunsheetError::Validation(format!(
                "Order total cannot be negative: {}",
                self.total_amount
            )));
        }

        for item in &self.items {
            if item.quantity <= BigDecimal::from(0) {
                return Err(RunsheetError::Validation(
                    "Item quantities must be positive".to_string(),
                ));
            }
            if item.price < BigDecimal::from(0) {
                return Err(RunsheetError::Validation(
                    "Item prices cannot be negative".to_string(),
                ));
            }
            if item.subtotal != &item.quantity * &item.price {
                return Err(RunsheetError::Validation(format!(
                    "Item subtotal does not match quantity * price for '{}'",
                    item.product_name
                )));
            }
        }

        if !self.items.is_empty() && self.total_amount != self.items_total() {
            return Err(RunsheetError::Validation(format!(
                "Order total does not match item subtotals: total = {}, items = {}",
                self.total_amount,
                self.items_total()
            )));
        }

        Ok(())
    }
}

/// Runsheet lifecycle statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunsheetStatus {
    /// Runsheet created, orders being assigned
    Created,
    /// Rider is out on the run
    InTransit,
    /// Collections verified and runsheet closed
    Closed,
}

/// A batch of delivery orders assigned to one rider for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runsheet {
    /// Unique identifier for the runsheet (e.g. RS-2025-001)
    pub id: String,
    /// Assigned rider
    pub rider_id: String,
    /// Rider name at assignment time
    pub rider_name: String,
    /// Date of the run
    pub run_date: NaiveDate,
    /// Route zone for the run
    pub zone: String,
    /// Orders assigned to this run
    pub order_ids: Vec<String>,
    /// Current lifecycle status
    pub status: RunsheetStatus,
    /// When close was requested
    pub close_requested_at: Option<NaiveDateTime>,
    /// When the runsheet was closed
    pub closed_at: Option<NaiveDateTime>,
    /// When the runsheet was created
    pub created_at: NaiveDateTime,
    /// When the runsheet was last updated
    pub updated_at: NaiveDateTime,
}

impl Runsheet {
    /// Create a new runsheet in `Created` status with no orders assigned
    pub fn new(
        id: String,
        rider_id: String,
        rider_name: String,
        run_date: NaiveDate,
        zone: String,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            rider_id,
            rider_name,
            run_date,
            zone,
            order_ids: Vec::new(),
            status: RunsheetStatus::Created,
            close_requested_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign an order to the runsheet
    pub fn assign_order(&mut self, order_id: String) {
        self.order_ids.push(order_id);
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Number of stops on the run
    pub fn total_stops(&self) -> usize {
        self.order_ids.len()
    }
}

/// Delivery progress for a runsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    /// Total orders assigned to the runsheet
    pub total_orders: usize,
    /// Orders delivered so far
    pub delivered_orders: usize,
    /// Rounded completion percentage (0 when the runsheet is empty)
    pub completion_percent: u32,
}

impl DeliverySummary {
    /// Build a summary from delivered/total counts
    pub fn from_counts(total_orders: usize, delivered_orders: usize) -> Self {
        let completion_percent = if total_orders > 0 {
            ((delivered_orders * 100 + total_orders / 2) / total_orders) as u32
        } else {
            0
        };
        Self {
            total_orders,
            delivered_orders,
            completion_percent,
        }
    }
}

/// Money expected from a runsheet, split by payment mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Sum of COD-mode order totals - the amount the rider must hand in
    pub expected_cod: BigDecimal,
    /// Sum of prepaid order totals
    pub prepaid_total: BigDecimal,
    /// Grand total across both payment modes
    pub grand_total: BigDecimal,
}

/// Errors that can occur in the runsheet system
#[derive(Debug, thiserror::Error)]
pub enum RunsheetError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Runsheet not found: {0}")]
    RunsheetNotFound(String),
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
}

/// Result type for runsheet operations
pub type RunsheetResult<T> = Result<T, RunsheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let mut order = Order::new(
            "ORD001".to_string(),
            "ORD-20251010-0001".to_string(),
            "Rajesh Kumar".to_string(),
            "+91 98765 43210".to_string(),
            "123, MG Road, Sector 15, Gurugram".to_string(),
            "Zone A".to_string(),
            PaymentMode::Cod,
            "11:00 AM - 1:00 PM".to_string(),
        );
        order.add_item(OrderItem::new(
            "OI001".to_string(),
            "P001".to_string(),
            "Organic Tomatoes".to_string(),
            BigDecimal::from(2),
            BigDecimal::from(45),
        ));
        order.add_item(OrderItem::new(
            "OI002".to_string(),
            "P004".to_string(),
            "Shimla Apples".to_string(),
            BigDecimal::from(2),
            BigDecimal::from(120),
        ));
        order
    }

    #[test]
    fn test_order_total_tracks_items() {
        let order = sample_order();
        assert_eq!(order.total_amount, BigDecimal::from(330));
        assert_eq!(order.items_total(), BigDecimal::from(330));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_order_rejects_inconsistent_total() {
        let mut order = sample_order();
        order.total_amount = BigDecimal::from(999);
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_order_status_pipeline() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Packed.can_transition_to(OrderStatus::Dispatched));
        assert!(OrderStatus::Dispatched.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Placed));
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Dispatched.is_terminal());
    }

    #[test]
    fn test_delivery_summary_rounding() {
        let summary = DeliverySummary::from_counts(18, 12);
        assert_eq!(summary.completion_percent, 67);

        let empty = DeliverySummary::from_counts(0, 0);
        assert_eq!(empty.completion_percent, 0);

        let done = DeliverySummary::from_counts(3, 3);
        assert_eq!(done.completion_percent, 100);
    }
}
