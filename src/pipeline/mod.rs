//! Request orchestration: static data, market enrichment, and valuation.

use crate::domain::{SystemCostIndices, SystemId, TradeHub, TypeId, TypeNode};
use crate::engine::{BomGraph, ValuationError, ValuationTuning, Valuator};
use crate::provider::{MarketSource, UpstreamError};
use crate::sde::SdeCatalog;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub mod enrich;
pub mod indices;

pub use enrich::MarketEnricher;
pub use indices::CostIndexResolver;

/// Errors an endpoint request can surface.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested type has no manufacturing or reaction blueprint.
    #[error("type {0} has no manufacturing or reaction recipe")]
    NoRecipe(TypeId),
    /// The cost index table has no entry for the requested system.
    #[error("solar system {0} reports no cost indices")]
    SystemNotFound(SystemId),
    #[error(transparent)]
    InvalidRecipe(#[from] ValuationError),
    #[error(transparent)]
    Catalog(#[from] sqlx::Error),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// End-to-end valuation flow shared by the HTTP handlers.
pub struct ValuationPipeline {
    catalog: Arc<SdeCatalog>,
    source: Arc<dyn MarketSource>,
    tuning: ValuationTuning,
}

impl ValuationPipeline {
    pub fn new(
        catalog: Arc<SdeCatalog>,
        source: Arc<dyn MarketSource>,
        tuning: ValuationTuning,
    ) -> Self {
        ValuationPipeline {
            catalog,
            source,
            tuning,
        }
    }

    /// Build, enrich, and value the full ingredient graph for one type.
    ///
    /// Market enrichment and cost index resolution run concurrently; both
    /// only start after the static closure proves the type is buildable.
    pub async fn materials(
        &self,
        root: TypeId,
        hub: TradeHub,
        build_system: SystemId,
    ) -> Result<BTreeMap<TypeId, TypeNode>, PipelineError> {
        let rows = self.catalog.recipe_closure(root).await?;
        if rows.is_empty() {
            return Err(PipelineError::NoRecipe(root));
        }

        let mut graph = BomGraph::build(root, &rows);
        self.attach_names(graph.nodes_mut()).await?;

        let enricher = MarketEnricher::new(Arc::clone(&self.source), hub);
        let resolver = CostIndexResolver::new(Arc::clone(&self.source));
        let (_, indices) = tokio::join!(
            enricher.enrich(graph.nodes_mut()),
            resolver.resolve(build_system),
        );
        let indices = indices?;

        Valuator::new(self.tuning).evaluate(&mut graph, &indices)?;
        Ok(graph.into_nodes())
    }

    /// Hub order book splits for an arbitrary set of types.
    pub async fn market_view(
        &self,
        ids: &[TypeId],
        hub: TradeHub,
    ) -> Result<BTreeMap<TypeId, TypeNode>, PipelineError> {
        let mut nodes: BTreeMap<TypeId, TypeNode> =
            ids.iter().map(|id| (*id, TypeNode::new(*id))).collect();
        self.attach_names(&mut nodes).await?;

        let enricher = MarketEnricher::new(Arc::clone(&self.source), hub);
        enricher.attach_order_books(&mut nodes).await;
        Ok(nodes)
    }

    /// The raw universe cost index table, labels untouched.
    pub async fn cost_table(&self) -> Result<Vec<SystemCostIndices>, PipelineError> {
        Ok(self.source.system_cost_indices().await?)
    }

    async fn attach_names(
        &self,
        nodes: &mut BTreeMap<TypeId, TypeNode>,
    ) -> Result<(), PipelineError> {
        let ids: Vec<TypeId> = nodes.keys().copied().collect();
        let names = self.catalog.type_names(&ids).await?;
        for (id, name) in names {
            if let Some(node) = nodes.get_mut(&id) {
                node.name = Some(name);
            }
        }
        Ok(())
    }
}
