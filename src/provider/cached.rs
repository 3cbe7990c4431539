//! Caching layer over a market source.
//!
//! Each upstream feed gets its own snapshot cache: order books are keyed by
//! (region, type), while the adjusted price table and the cost index table
//! are universe-wide singletons.

use super::{MarketSource, UpstreamError};
use crate::cache::SnapshotCache;
use crate::domain::{AdjustedPrice, MarketOrder, RegionId, SystemCostIndices, TypeId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a market source so repeated and concurrent requests within the
/// snapshot window are served from memory.
#[derive(Debug)]
pub struct CachedMarketSource {
    inner: Arc<dyn MarketSource>,
    orders: SnapshotCache<(RegionId, TypeId), Vec<MarketOrder>>,
    prices: SnapshotCache<(), Vec<AdjustedPrice>>,
    systems: SnapshotCache<(), Vec<SystemCostIndices>>,
}

impl CachedMarketSource {
    /// Cache `inner` with the given snapshot lifetime. `None` caches until
    /// the process exits.
    pub fn new(inner: Arc<dyn MarketSource>, ttl: Option<Duration>) -> Self {
        CachedMarketSource {
            inner,
            orders: SnapshotCache::new(ttl),
            prices: SnapshotCache::new(ttl),
            systems: SnapshotCache::new(ttl),
        }
    }
}

#[async_trait]
impl MarketSource for CachedMarketSource {
    async fn region_orders(
        &self,
        region: RegionId,
        type_id: TypeId,
    ) -> Result<Vec<MarketOrder>, UpstreamError> {
        self.orders
            .get_or_fetch((region, type_id), || {
                self.inner.region_orders(region, type_id)
            })
            .await
    }

    async fn adjusted_prices(&self) -> Result<Vec<AdjustedPrice>, UpstreamError> {
        self.prices
            .get_or_fetch((), || self.inner.adjusted_prices())
            .await
    }

    async fn system_cost_indices(&self) -> Result<Vec<SystemCostIndices>, UpstreamError> {
        self.systems
            .get_or_fetch((), || self.inner.system_cost_indices())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingSource {
        orders_calls: AtomicUsize,
        prices_calls: AtomicUsize,
        systems_calls: AtomicUsize,
        fail_prices: bool,
    }

    #[async_trait]
    impl MarketSource for CountingSource {
        async fn region_orders(
            &self,
            _region: RegionId,
            type_id: TypeId,
        ) -> Result<Vec<MarketOrder>, UpstreamError> {
            self.orders_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(vec![MarketOrder {
                order_id: 1,
                type_id,
                location_id: crate::domain::LocationId::new(60003760),
                is_buy_order: true,
                price: Decimal::from_str_canonical("10").unwrap(),
                volume_remain: 100,
                issued: "2026-08-20T14:00:00Z".parse().unwrap(),
            }])
        }

        async fn adjusted_prices(&self) -> Result<Vec<AdjustedPrice>, UpstreamError> {
            self.prices_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_prices {
                return Err(UpstreamError::RateLimited);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(vec![AdjustedPrice {
                type_id: TypeId::new(34),
                adjusted_price: Some(Decimal::from_str_canonical("6.58").unwrap()),
            }])
        }

        async fn system_cost_indices(&self) -> Result<Vec<SystemCostIndices>, UpstreamError> {
            self.systems_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_order_books_cached_per_region_and_type() {
        let counting = Arc::new(CountingSource::default());
        let cached = CachedMarketSource::new(counting.clone(), None);
        let region = RegionId::new(10000002);

        cached.region_orders(region, TypeId::new(34)).await.unwrap();
        cached.region_orders(region, TypeId::new(35)).await.unwrap();
        cached.region_orders(region, TypeId::new(34)).await.unwrap();

        assert_eq!(counting.orders_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_price_table_requests_coalesce() {
        let counting = Arc::new(CountingSource::default());
        let cached = CachedMarketSource::new(counting.clone(), None);

        let (a, b) = tokio::join!(cached.adjusted_prices(), cached.adjusted_prices());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(counting.prices_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_pass_through_uncached() {
        let counting = Arc::new(CountingSource {
            fail_prices: true,
            ..CountingSource::default()
        });
        let cached = CachedMarketSource::new(counting.clone(), None);

        assert!(cached.adjusted_prices().await.is_err());
        assert!(cached.adjusted_prices().await.is_err());
        assert_eq!(counting.prices_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_system_indices_cached_after_first_call() {
        let counting = Arc::new(CountingSource::default());
        let cached = CachedMarketSource::new(counting.clone(), None);

        cached.system_cost_indices().await.unwrap();
        cached.system_cost_indices().await.unwrap();
        assert_eq!(counting.systems_calls.load(Ordering::SeqCst), 1);
    }
}
