//! Mock market source for testing without network calls.

use super::{MarketSource, UpstreamError};
use crate::domain::{AdjustedPrice, Decimal, MarketOrder, RegionId, SystemCostIndices, TypeId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Mock market source that returns predefined test data.
#[derive(Debug, Clone)]
pub struct MockMarketSource {
    orders: HashMap<(RegionId, TypeId), Vec<MarketOrder>>,
    adjusted: Vec<AdjustedPrice>,
    systems: Vec<SystemCostIndices>,
    fail_orders_for: HashSet<TypeId>,
    fail_adjusted: bool,
    fail_systems: bool,
}

impl MockMarketSource {
    /// Create a new mock market source with empty data.
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            adjusted: Vec::new(),
            systems: Vec::new(),
            fail_orders_for: HashSet::new(),
            fail_adjusted: false,
            fail_systems: false,
        }
    }

    /// Add one order to the book for its type in the given region.
    pub fn with_order(mut self, region: RegionId, order: MarketOrder) -> Self {
        self.orders
            .entry((region, order.type_id))
            .or_default()
            .push(order);
        self
    }

    /// Replace the order book for one type in one region.
    pub fn with_orders(
        mut self,
        region: RegionId,
        type_id: TypeId,
        orders: Vec<MarketOrder>,
    ) -> Self {
        self.orders.insert((region, type_id), orders);
        self
    }

    /// Add an adjusted price table entry.
    pub fn with_adjusted_price(mut self, type_id: TypeId, price: Decimal) -> Self {
        self.adjusted.push(AdjustedPrice {
            type_id,
            adjusted_price: Some(price),
        });
        self
    }

    /// Add a solar system's cost index entry.
    pub fn with_system(mut self, system: SystemCostIndices) -> Self {
        self.systems.push(system);
        self
    }

    /// Make order book fetches for one type fail.
    pub fn failing_orders_for(mut self, type_id: TypeId) -> Self {
        self.fail_orders_for.insert(type_id);
        self
    }

    /// Make adjusted price fetches fail.
    pub fn failing_adjusted_prices(mut self) -> Self {
        self.fail_adjusted = true;
        self
    }

    /// Make cost index fetches fail.
    pub fn failing_system_indices(mut self) -> Self {
        self.fail_systems = true;
        self
    }
}

impl Default for MockMarketSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketSource for MockMarketSource {
    async fn region_orders(
        &self,
        region: RegionId,
        type_id: TypeId,
    ) -> Result<Vec<MarketOrder>, UpstreamError> {
        if self.fail_orders_for.contains(&type_id) {
            return Err(UpstreamError::NetworkError(format!(
                "injected order book failure for type {}",
                type_id
            )));
        }
        Ok(self
            .orders
            .get(&(region, type_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn adjusted_prices(&self) -> Result<Vec<AdjustedPrice>, UpstreamError> {
        if self.fail_adjusted {
            return Err(UpstreamError::NetworkError(
                "injected adjusted price failure".to_string(),
            ));
        }
        Ok(self.adjusted.clone())
    }

    async fn system_cost_indices(&self) -> Result<Vec<SystemCostIndices>, UpstreamError> {
        if self.fail_systems {
            return Err(UpstreamError::NetworkError(
                "injected cost index failure".to_string(),
            ));
        }
        Ok(self.systems.clone())
    }
}
