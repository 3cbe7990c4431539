//! Market enrichment: order book splits and adjusted prices onto graph nodes.
//!
//! All fetches happen first, concurrently; the results are then applied by
//! pure functions. A failed order book fetch degrades that one node to
//! unknown prices instead of failing the whole request.

use crate::domain::{
    AdjustedPrice, Decimal, LocationId, MarketOrder, TradeHub, TypeId, TypeNode,
};
use crate::provider::{MarketSource, UpstreamError};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

/// Attaches hub market data to a set of nodes.
pub struct MarketEnricher {
    source: Arc<dyn MarketSource>,
    hub: TradeHub,
}

impl MarketEnricher {
    pub fn new(source: Arc<dyn MarketSource>, hub: TradeHub) -> Self {
        MarketEnricher { source, hub }
    }

    /// Full enrichment for a build graph: station order book splits on every
    /// node plus adjusted prices on nodes that produce or feed a recipe.
    pub async fn enrich(&self, nodes: &mut BTreeMap<TypeId, TypeNode>) {
        let ids: Vec<TypeId> = nodes.keys().copied().collect();
        let (books, adjusted) = tokio::join!(
            self.fetch_order_books(&ids),
            self.source.adjusted_prices(),
        );

        apply_order_books(nodes, self.hub.station, books);
        match adjusted {
            Ok(table) => apply_adjusted_prices(nodes, &table),
            Err(err) => warn!("Adjusted price table unavailable: {}", err),
        }
    }

    /// Order book splits only, for market lookups with no recipe context.
    pub async fn attach_order_books(&self, nodes: &mut BTreeMap<TypeId, TypeNode>) {
        let ids: Vec<TypeId> = nodes.keys().copied().collect();
        let books = self.fetch_order_books(&ids).await;
        apply_order_books(nodes, self.hub.station, books);
    }

    async fn fetch_order_books(
        &self,
        ids: &[TypeId],
    ) -> Vec<(TypeId, Result<Vec<MarketOrder>, UpstreamError>)> {
        let fetches = ids.iter().map(|id| async move {
            (*id, self.source.region_orders(self.hub.region, *id).await)
        });
        join_all(fetches).await
    }
}

fn apply_order_books(
    nodes: &mut BTreeMap<TypeId, TypeNode>,
    station: LocationId,
    books: Vec<(TypeId, Result<Vec<MarketOrder>, UpstreamError>)>,
) {
    for (id, result) in books {
        match result {
            Ok(orders) => {
                if let Some(node) = nodes.get_mut(&id) {
                    let (buy, sell) = split_station_book(&orders, station);
                    node.buy = buy;
                    node.sell = sell;
                }
            }
            Err(err) => warn!("Order book for type {} unavailable: {}", id, err),
        }
    }
}

/// Best bid and best ask among orders sitting at one station.
///
/// `buy` is the highest price a standing buy order pays; `sell` is the
/// lowest ask. Regional orders at other stations are ignored.
fn split_station_book(
    orders: &[MarketOrder],
    station: LocationId,
) -> (Option<Decimal>, Option<Decimal>) {
    let mut best_bid: Option<Decimal> = None;
    let mut best_ask: Option<Decimal> = None;
    for order in orders.iter().filter(|o| o.location_id == station) {
        if order.is_buy_order {
            best_bid = Some(best_bid.map_or(order.price, |b| b.max(order.price)));
        } else {
            best_ask = Some(best_ask.map_or(order.price, |a| a.min(order.price)));
        }
    }
    (best_bid, best_ask)
}

fn apply_adjusted_prices(nodes: &mut BTreeMap<TypeId, TypeNode>, table: &[AdjustedPrice]) {
    let by_type: HashMap<TypeId, Decimal> = table
        .iter()
        .filter_map(|entry| entry.adjusted_price.map(|price| (entry.type_id, price)))
        .collect();

    for node in nodes.values_mut() {
        // Job fees price a recipe's inputs by their adjusted price, so the
        // table only matters for nodes that produce or feed a recipe.
        if node.recipe.is_some() || !node.outputs.is_empty() {
            if let Some(price) = by_type.get(&node.id) {
                node.adjusted_price = Some(*price);
            }
        }
    }
}
