pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod sde;

pub use cache::SnapshotCache;
pub use config::Config;
pub use domain::{
    Activity, AdjustedPrice, CostIndices, Decimal, LocationId, MarketOrder, Recipe, RegionId,
    SystemCostIndices, SystemId, TradeHub, TypeId, TypeNode, Valuation,
};
pub use engine::{BomGraph, ValuationTuning, Valuator};
pub use error::AppError;
pub use pipeline::ValuationPipeline;
pub use provider::{CachedMarketSource, EsiMarketSource, MarketSource, MockMarketSource};
pub use sde::SdeCatalog;
