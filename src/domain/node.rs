//! Graph node types: one node per item type, carrying recipe links,
//! market fields, and the computed valuation.

use crate::domain::{Activity, Decimal, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a type is produced: which activity, and how many units one run yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Industry activity that produces this type.
    pub activity: Activity,
    /// Units of output per blueprint run.
    pub output_quantity: i64,
}

impl Recipe {
    pub fn new(activity: Activity, output_quantity: i64) -> Self {
        Recipe {
            activity,
            output_quantity,
        }
    }
}

/// Computed build economics for one node.
///
/// Every field is optional: a missing upstream price leaves the dependent
/// figures unset rather than zero, so "unknown" never masquerades as "free".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    /// Sum over direct inputs of adjusted quantity times best unit cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_cost: Option<Decimal>,
    /// Sum over direct inputs of unadjusted quantity times adjusted price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_base_cost: Option<Decimal>,
    /// Cost index applied to this node's activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_index: Option<Decimal>,
    /// Job base cost times cost index times facility tax multiplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_fees: Option<Decimal>,
    /// Material cost plus job fees, for one run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint_cost: Option<Decimal>,
    /// Blueprint cost divided by units per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    /// Fraction of the sell price kept when building instead of buying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Decimal>,
}

/// One item type in a build graph.
///
/// `inputs` maps direct ingredient type to per-run quantity; `outputs` is the
/// inverse view (consumers of this type and how many units each takes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    /// The item type this node describes.
    pub id: TypeId,
    /// Display name from the catalog, when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Production recipe, absent for leaf (buy-only) types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    /// Direct ingredients: input type id to quantity per run.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub inputs: BTreeMap<TypeId, i64>,
    /// Inverse view: consumer type id to quantity that consumer takes per run.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub outputs: BTreeMap<TypeId, i64>,
    /// Best price someone pays for this type at the hub station.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy: Option<Decimal>,
    /// Cheapest ask for this type at the hub station.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell: Option<Decimal>,
    /// Smoothed reference price used for job fee calculation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_price: Option<Decimal>,
    /// Build economics, filled by the valuation pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<Valuation>,
}

impl TypeNode {
    /// Create an empty node for a type. All market and valuation fields unset.
    pub fn new(id: TypeId) -> Self {
        TypeNode {
            id,
            name: None,
            recipe: None,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            buy: None,
            sell: None,
            adjusted_price: None,
            valuation: None,
        }
    }

    /// True when this node has no recipe and must be bought.
    pub fn is_leaf(&self) -> bool {
        self.recipe.is_none()
    }

    /// The price used when comparing make against buy: the cheaper of the
    /// hub buy price and the computed unit cost, among those known.
    pub fn best_unit_cost(&self) -> Option<Decimal> {
        let built = self.valuation.as_ref().and_then(|v| v.unit_cost);
        match (self.buy, built) {
            (Some(b), Some(u)) => Some(b.min(u)),
            (Some(b), None) => Some(b),
            (None, Some(u)) => Some(u),
            (None, None) => None,
        }
    }
}
