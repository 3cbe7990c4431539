//! Pure computation engine for build graphs and their valuation.

use crate::domain::Decimal;
use rust_decimal::Decimal as RustDecimal;

pub mod efficiency;
pub mod graph;
pub mod valuation;

pub use efficiency::effective_run_quantity;
pub use graph::{BomGraph, RecipeRow};
pub use valuation::{ValuationError, Valuator};

/// Knobs for the valuation pass.
///
/// The defaults model a rig-less structure running max-length jobs: material
/// efficiency applies to manufacturing only, and batch size is however many
/// runs fit in the job ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValuationTuning {
    /// Per-run input multiplier for manufacturing. Other activities use 1.
    pub manufacturing_me_factor: Decimal,
    /// Facility tax applied on top of indexed job fees.
    pub tax_multiplier: Decimal,
    /// Longest job the facility accepts, in seconds.
    pub max_job_secs: i64,
    /// Duration of a single run, in seconds.
    pub run_secs: i64,
}

impl ValuationTuning {
    /// Runs per batch: how many runs fit in the job ceiling, at least one.
    pub fn runs(&self) -> i64 {
        let per = self.run_secs.max(1);
        ((self.max_job_secs + per - 1) / per).max(1)
    }
}

impl Default for ValuationTuning {
    fn default() -> Self {
        ValuationTuning {
            manufacturing_me_factor: Decimal::new(RustDecimal::new(9, 1)),
            tax_multiplier: Decimal::new(RustDecimal::new(11, 1)),
            max_job_secs: 2_592_000,
            run_secs: 25_920,
        }
    }
}
