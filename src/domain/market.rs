//! Market data shapes: live orders, adjusted prices, and system cost indices.
//!
//! The raw structs mirror the upstream feed's snake_case JSON one to one.

use crate::domain::{Activity, Decimal, LocationId, SystemId, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One live order in a regional order book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub order_id: i64,
    pub type_id: TypeId,
    /// Station or structure the order sits in.
    pub location_id: LocationId,
    /// True for buy orders, false for sell orders.
    pub is_buy_order: bool,
    pub price: Decimal,
    pub volume_remain: i64,
    /// When the order was placed or last updated.
    pub issued: chrono::DateTime<chrono::Utc>,
}

/// Smoothed reference price for one type, from the universe-wide price feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedPrice {
    pub type_id: TypeId,
    /// Absent for types the feed has no reference price for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_price: Option<Decimal>,
}

/// Raw per-activity cost index entry as the feed reports it.
///
/// The activity label stays a string here; the feed uses singular
/// `reaction` and normalization happens when the table is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCostIndex {
    pub activity: String,
    pub cost_index: Decimal,
}

/// Cost indices for one solar system, as the feed reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCostIndices {
    pub solar_system_id: SystemId,
    pub cost_indices: Vec<ActivityCostIndex>,
}

/// Resolved cost indices for the build system, keyed by activity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostIndices {
    indices: BTreeMap<Activity, Decimal>,
}

impl CostIndices {
    pub fn new() -> Self {
        CostIndices {
            indices: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, activity: Activity, index: Decimal) {
        self.indices.insert(activity, index);
    }

    /// Look up the index for an activity. None when the system reported none.
    pub fn get(&self, activity: Activity) -> Option<Decimal> {
        self.indices.get(&activity).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

impl FromIterator<(Activity, Decimal)> for CostIndices {
    fn from_iter<I: IntoIterator<Item = (Activity, Decimal)>>(iter: I) -> Self {
        CostIndices {
            indices: iter.into_iter().collect(),
        }
    }
}
