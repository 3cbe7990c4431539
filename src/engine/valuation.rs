//! Recursive build-cost valuation over a BOM graph.
//!
//! The pass walks the graph bottom-up from the root, filling each recipe
//! node's [`Valuation`]. Missing upstream data (no orders, no adjusted
//! price, no cost index) leaves the dependent figures unset; an unknown
//! cost never contributes zero to an ancestor.

use crate::domain::{CostIndices, Decimal, TypeId, Valuation};
use crate::engine::{effective_run_quantity, BomGraph, ValuationTuning};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the valuation pass. These reflect malformed recipe data,
/// not missing market data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValuationError {
    /// A recipe chain loops back on itself.
    #[error("recipe cycle detected through type {0}")]
    RecipeCycle(TypeId),
    /// A recipe claims to produce zero or fewer units per run.
    #[error("recipe for type {0} has non-positive output quantity")]
    BadOutputQuantity(TypeId),
    /// An input edge points at a type the graph has no node for.
    #[error("type {0} is not present in the graph")]
    MissingNode(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Computes build economics for every recipe node reachable from the root.
#[derive(Debug, Clone, Default)]
pub struct Valuator {
    tuning: ValuationTuning,
}

impl Valuator {
    pub fn new(tuning: ValuationTuning) -> Self {
        Valuator { tuning }
    }

    /// Value the graph from its root. Children are valued before parents so
    /// each parent can compare its children's build cost against their buy
    /// price. Leaf nodes get no valuation; their cost is their buy price.
    pub fn evaluate(
        &self,
        graph: &mut BomGraph,
        indices: &CostIndices,
    ) -> Result<(), ValuationError> {
        let root = graph.root();
        let mut visits = HashMap::new();
        self.visit(graph, root, indices, &mut visits)
    }

    fn visit(
        &self,
        graph: &mut BomGraph,
        id: TypeId,
        indices: &CostIndices,
        visits: &mut HashMap<TypeId, Visit>,
    ) -> Result<(), ValuationError> {
        match visits.get(&id) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => return Err(ValuationError::RecipeCycle(id)),
            None => {}
        }

        let (recipe, input_list) = {
            let node = graph.node(id).ok_or(ValuationError::MissingNode(id))?;
            match node.recipe {
                None => {
                    visits.insert(id, Visit::Done);
                    return Ok(());
                }
                Some(recipe) => {
                    let inputs: Vec<(TypeId, i64)> =
                        node.inputs.iter().map(|(k, v)| (*k, *v)).collect();
                    (recipe, inputs)
                }
            }
        };

        if recipe.output_quantity <= 0 {
            return Err(ValuationError::BadOutputQuantity(id));
        }

        visits.insert(id, Visit::InProgress);
        for (child_id, _) in &input_list {
            self.visit(graph, *child_id, indices, visits)?;
        }

        let mut material_cost = Some(Decimal::zero());
        let mut job_base_cost = Some(Decimal::zero());
        for (child_id, quantity) in &input_list {
            let child = graph
                .node(*child_id)
                .ok_or(ValuationError::MissingNode(*child_id))?;

            let effective = effective_run_quantity(&self.tuning, recipe.activity, *quantity);
            material_cost = match (material_cost, child.best_unit_cost()) {
                (Some(total), Some(cost)) => Some(total + effective * cost),
                _ => None,
            };
            job_base_cost = match (job_base_cost, child.adjusted_price) {
                (Some(total), Some(adjusted)) => {
                    Some(total + Decimal::from(*quantity) * adjusted)
                }
                _ => None,
            };
        }

        let cost_index = indices.get(recipe.activity);
        let job_fees = match (job_base_cost, cost_index) {
            (Some(base), Some(index)) => Some(base * index * self.tuning.tax_multiplier),
            _ => None,
        };
        let blueprint_cost = match (material_cost, job_fees) {
            (Some(materials), Some(fees)) => Some(materials + fees),
            _ => None,
        };
        let unit_cost =
            blueprint_cost.map(|total| total / Decimal::from(recipe.output_quantity));

        let node = graph.node_mut(id).ok_or(ValuationError::MissingNode(id))?;
        let margin = match (node.sell, unit_cost) {
            (Some(sell), Some(unit)) if sell.is_positive() => Some((sell - unit) / sell),
            _ => None,
        };
        node.valuation = Some(Valuation {
            material_cost,
            job_base_cost,
            cost_index,
            job_fees,
            blueprint_cost,
            unit_cost,
            margin,
        });
        visits.insert(id, Visit::Done);
        Ok(())
    }
}
