//! Material-efficiency quantization.
//!
//! Savings from material efficiency are only real at batch granularity: a
//! batch consumes `ceil(runs * factor * quantity)` units, never fewer than
//! one per run, and the per-run figure is that total divided back by runs.

use crate::domain::{Activity, Decimal};
use crate::engine::ValuationTuning;

/// Effective per-run input quantity after batch-level rounding.
///
/// The efficiency factor applies to manufacturing only; every other
/// activity consumes the unmodified quantity.
pub fn effective_run_quantity(
    tuning: &ValuationTuning,
    activity: Activity,
    quantity: i64,
) -> Decimal {
    let runs = Decimal::from(tuning.runs());
    let factor = match activity {
        Activity::Manufacturing => tuning.manufacturing_me_factor,
        _ => Decimal::one(),
    };

    let batch_total = (runs * factor * Decimal::from(quantity)).ceil();
    batch_total.max(runs) / runs
}
