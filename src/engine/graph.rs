//! Build-graph assembly from flat recipe rows.

use crate::domain::{Activity, Recipe, TypeId, TypeNode};
use std::collections::BTreeMap;

/// One catalog row: a recipe's output joined to one of its inputs.
///
/// A recipe with N inputs arrives as N rows sharing the output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeRow {
    pub output_id: TypeId,
    pub output_quantity: i64,
    pub activity: Activity,
    pub input_id: TypeId,
    pub input_quantity: i64,
}

/// The full ingredient graph under one root type.
///
/// Each type appears exactly once regardless of how many recipes consume it;
/// a node's `outputs` map is the inverse view over its consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomGraph {
    root: TypeId,
    nodes: BTreeMap<TypeId, TypeNode>,
}

impl BomGraph {
    /// Assemble the graph for `root` from flat rows.
    ///
    /// Nodes are created lazily as rows mention them and merged in place.
    /// With no rows at all the result is a single recipe-less root node.
    pub fn build(root: TypeId, rows: &[RecipeRow]) -> Self {
        let mut graph = BomGraph {
            root,
            nodes: BTreeMap::new(),
        };
        graph.ensure_node(root);

        for row in rows {
            let output = graph.ensure_node(row.output_id);
            output.recipe = Some(Recipe::new(row.activity, row.output_quantity));
            output.inputs.insert(row.input_id, row.input_quantity);

            let input = graph.ensure_node(row.input_id);
            input.outputs.insert(row.output_id, row.input_quantity);
        }

        graph
    }

    pub fn root(&self) -> TypeId {
        self.root
    }

    /// Get or create the node for a type.
    pub fn ensure_node(&mut self, id: TypeId) -> &mut TypeNode {
        self.nodes.entry(id).or_insert_with(|| TypeNode::new(id))
    }

    pub fn node(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: TypeId) -> Option<&mut TypeNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All type ids in the graph, in key order.
    pub fn ids(&self) -> Vec<TypeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &BTreeMap<TypeId, TypeNode> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut BTreeMap<TypeId, TypeNode> {
        &mut self.nodes
    }

    pub fn into_nodes(self) -> BTreeMap<TypeId, TypeNode> {
        self.nodes
    }
}
