//! Cost index resolution for the build system.

use super::PipelineError;
use crate::domain::{Activity, CostIndices, SystemCostIndices, SystemId};
use crate::provider::MarketSource;
use std::sync::Arc;
use tracing::warn;

/// Resolves the cost index table down to one system's activity map.
pub struct CostIndexResolver {
    source: Arc<dyn MarketSource>,
}

impl CostIndexResolver {
    pub fn new(source: Arc<dyn MarketSource>) -> Self {
        CostIndexResolver { source }
    }

    /// Fetch the universe table and pull out one system's indices, with
    /// feed labels normalized to activity kinds.
    ///
    /// A failed table fetch degrades to an empty map, leaving the fee side
    /// of every valuation unknown. Only a fetched table that lacks the
    /// requested system is an error.
    pub async fn resolve(&self, system: SystemId) -> Result<CostIndices, PipelineError> {
        let systems = match self.source.system_cost_indices().await {
            Ok(systems) => systems,
            Err(err) => {
                warn!("Cost index fetch failed, job fees will be unknown: {}", err);
                return Ok(CostIndices::new());
            }
        };
        let entry = systems
            .iter()
            .find(|s| s.solar_system_id == system)
            .ok_or(PipelineError::SystemNotFound(system))?;
        Ok(normalize_indices(entry))
    }
}

fn normalize_indices(entry: &SystemCostIndices) -> CostIndices {
    let mut indices = CostIndices::new();
    for index in &entry.cost_indices {
        match index.activity.parse::<Activity>() {
            Ok(activity) => indices.insert(activity, index.cost_index),
            Err(_) => warn!(
                "Skipping unrecognized activity label '{}' for system {}",
                index.activity, entry.solar_system_id
            ),
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityCostIndex, Decimal};
    use crate::provider::MockMarketSource;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn system_entry(system_id: i64, indices: &[(&str, &str)]) -> SystemCostIndices {
        SystemCostIndices {
            solar_system_id: SystemId::new(system_id),
            cost_indices: indices
                .iter()
                .map(|(activity, index)| ActivityCostIndex {
                    activity: activity.to_string(),
                    cost_index: dec(index),
                })
                .collect(),
        }
    }

    #[test]
    fn test_normalize_maps_singular_reaction_label() {
        let entry = system_entry(
            30004759,
            &[("manufacturing", "0.05"), ("reaction", "0.02")],
        );
        let indices = normalize_indices(&entry);
        assert_eq!(indices.get(Activity::Manufacturing), Some(dec("0.05")));
        assert_eq!(indices.get(Activity::Reactions), Some(dec("0.02")));
    }

    #[test]
    fn test_normalize_skips_unknown_labels() {
        let entry = system_entry(
            30004759,
            &[("manufacturing", "0.05"), ("terraforming", "0.9")],
        );
        let indices = normalize_indices(&entry);
        assert_eq!(indices.len(), 1);
        assert_eq!(indices.get(Activity::Manufacturing), Some(dec("0.05")));
    }

    #[tokio::test]
    async fn test_resolve_finds_requested_system() {
        let source = Arc::new(
            MockMarketSource::new()
                .with_system(system_entry(30000142, &[("manufacturing", "0.9")]))
                .with_system(system_entry(30004759, &[("manufacturing", "0.05")])),
        );
        let resolver = CostIndexResolver::new(source);

        let indices = resolver.resolve(SystemId::new(30004759)).await.unwrap();
        assert_eq!(indices.get(Activity::Manufacturing), Some(dec("0.05")));
    }

    #[tokio::test]
    async fn test_resolve_unknown_system_is_not_found() {
        let source = Arc::new(
            MockMarketSource::new()
                .with_system(system_entry(30000142, &[("manufacturing", "0.9")])),
        );
        let resolver = CostIndexResolver::new(source);

        let err = resolver.resolve(SystemId::new(30004759)).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SystemNotFound(system) if system == SystemId::new(30004759)
        ));
    }

    #[tokio::test]
    async fn test_resolve_failed_fetch_degrades_to_empty() {
        let source = Arc::new(MockMarketSource::new().failing_system_indices());
        let resolver = CostIndexResolver::new(source);

        let indices = resolver.resolve(SystemId::new(30004759)).await.unwrap();
        assert!(indices.is_empty());
    }
}
