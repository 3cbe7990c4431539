//! Domain types for the build-cost valuation service.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TypeId, RegionId, SystemId, LocationId, Activity
//! - TypeNode graph nodes with recipe links and valuation results
//! - Market data shapes mirroring the upstream feeds

pub mod decimal;
pub mod market;
pub mod node;
pub mod primitives;

pub use decimal::Decimal;
pub use market::{
    ActivityCostIndex, AdjustedPrice, CostIndices, MarketOrder, SystemCostIndices,
};
pub use node::{Recipe, TypeNode, Valuation};
pub use primitives::{
    Activity, LocationId, RegionId, SystemId, TradeHub, TypeId, UnknownActivity,
};
