use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::AppState;
use crate::domain::{LocationId, RegionId, SystemId, TradeHub, TypeId, TypeNode};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct MaterialsQuery {
    #[serde(rename = "type")]
    pub type_id: Option<i64>,
    pub build_system: Option<i64>,
    pub highsec_region: Option<i64>,
    pub highsec_station: Option<i64>,
}

/// Full build-or-buy valuation for one type, keyed by every type in its
/// ingredient graph.
pub async fn get_materials(
    Query(params): Query<MaterialsQuery>,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<TypeId, TypeNode>>, AppError> {
    let type_id = params
        .type_id
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: type".into()))?;
    let root = TypeId::new(positive_id(type_id, "type")?);

    let region = match params.highsec_region {
        Some(raw) => RegionId::new(positive_id(raw, "highsec_region")?),
        None => state.config.highsec_region,
    };
    let station = match params.highsec_station {
        Some(raw) => LocationId::new(positive_id(raw, "highsec_station")?),
        None => state.config.highsec_station,
    };
    let build_system = match params.build_system {
        Some(raw) => SystemId::new(positive_id(raw, "build_system")?),
        None => state.config.build_system,
    };

    let nodes = state
        .pipeline
        .materials(root, TradeHub::new(region, station), build_system)
        .await?;
    Ok(Json(nodes))
}

pub(super) fn positive_id(value: i64, name: &str) -> Result<i64, AppError> {
    if value <= 0 {
        return Err(AppError::BadRequest(format!(
            "Query parameter {} must be a positive id",
            name
        )));
    }
    Ok(value)
}
