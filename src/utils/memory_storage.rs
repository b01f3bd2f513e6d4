//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::runsheet::collection::CollectionAttempt;
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    runsheets: Arc<RwLock<HashMap<String, Runsheet>>>,
    collections: Arc<RwLock<HashMap<String, CollectionAttempt>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.orders.write().unwrap().clear();
        self.runsheets.write().unwrap().clear();
        self.collections.write().unwrap().clear();
    }
}

#[async_trait]
impl RunsheetStorage for MemoryStorage {
    async fn save_order(&mut self, order: &Order) -> RunsheetResult<()> {
        self.orders
            .write()
            .unwrap()
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, order_id: &str) -> RunsheetResult<Option<Order>> {
        Ok(self.orders.read().unwrap().get(order_id).cloned())
    }

    async fn list_orders(&self, status: Option<OrderStatus>) -> RunsheetResult<Vec<Order>> {
        let orders = self.orders.read().unwrap();
        let filtered: Vec<Order> = orders
            .values()
            .filter(|order| status.is_none_or(|s| order.status == s))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_order(&mut self, order: &Order) -> RunsheetResult<()> {
        if self.orders.read().unwrap().contains_key(&order.id) {
            self.orders
                .write()
                .unwrap()
                .insert(order.id.clone(), order.clone());
            Ok(())
        } else {
            Err(RunsheetError::OrderNotFound(order.id.clone()))
        }
    }

    async fn save_runsheet(&mut self, runsheet: &Runsheet) -> RunsheetResult<()> {
        self.runsheets
            .write()
            .unwrap()
            .insert(runsheet.id.clone(), runsheet.clone());
        Ok(())
    }

    async fn get_runsheet(&self, runsheet_id: &str) -> RunsheetResult<Option<Runsheet>> {
        Ok(self.runsheets.read().unwrap().get(runsheet_id).cloned())
    }

    async fn list_runsheets(
        &self,
        status: Option<RunsheetStatus>,
    ) -> RunsheetResult<Vec<Runsheet>> {
        let runsheets = self.runsheets.read().unwrap();
        let filtered: Vec<Runsheet> = runsheets
            .values()
            .filter(|runsheet| status.is_none_or(|s| runsheet.status == s))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_runsheet(&mut self, runsheet: &Runsheet) -> RunsheetResult<()> {
        if self.runsheets.read().unwrap().contains_key(&runsheet.id) {
            self.runsheets
                .write()
                .unwrap()
                .insert(runsheet.id.clone(), runsheet.clone());
            Ok(())
        } else {
            Err(RunsheetError::RunsheetNotFound(runsheet.id.clone()))
        }
    }

    async fn save_collection(&mut self, attempt: &CollectionAttempt) -> RunsheetResult<()> {
        self.collections
            .write()
            .unwrap()
            .insert(attempt.id.clone(), attempt.clone());
        Ok(())
    }

    async fn get_collection(
        &self,
        attempt_id: &str,
    ) -> RunsheetResult<Option<CollectionAttempt>> {
        Ok(self.collections.read().unwrap().get(attempt_id).cloned())
    }

    async fn update_collection(&mut self, attempt: &CollectionAttempt) -> RunsheetResult<()> {
        if self.collections.read().unwrap().contains_key(&attempt.id) {
            self.collections
                .write()
                .unwrap()
                .insert(attempt.id.clone(), attempt.clone());
            Ok(())
        } else {
            Err(RunsheetError::CollectionNotFound(attempt.id.clone()))
        }
    }

    async fn list_runsheet_collections(
        &self,
        runsheet_id: &str,
    ) -> RunsheetResult<Vec<CollectionAttempt>> {
        let collections = self.collections.read().unwrap();
        let mut filtered: Vec<CollectionAttempt> = collections
            .values()
            .filter(|attempt| attempt.runsheet_id == runsheet_id)
            .cloned()
            .collect();
        // oldest first, so verification history reads in order
        filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(filtered)
    }
}
