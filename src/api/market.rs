use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::materials::positive_id;
use super::AppState;
use crate::domain::{LocationId, RegionId, TradeHub, TypeId, TypeNode};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub types: Option<String>,
    pub highsec_region: Option<i64>,
    pub highsec_station: Option<i64>,
}

/// Hub price splits for a comma-separated list of type ids. No recipe data
/// and no valuation, just names and best bid/ask.
pub async fn get_market(
    Query(params): Query<MarketQuery>,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<TypeId, TypeNode>>, AppError> {
    let raw = params
        .types
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: types".into()))?;
    let ids = parse_type_list(&raw)?;

    let region = match params.highsec_region {
        Some(raw) => RegionId::new(positive_id(raw, "highsec_region")?),
        None => state.config.highsec_region,
    };
    let station = match params.highsec_station {
        Some(raw) => LocationId::new(positive_id(raw, "highsec_station")?),
        None => state.config.highsec_station,
    };

    let nodes = state
        .pipeline
        .market_view(&ids, TradeHub::new(region, station))
        .await?;
    Ok(Json(nodes))
}

fn parse_type_list(raw: &str) -> Result<Vec<TypeId>, AppError> {
    let mut ids = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let id = token.parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("Invalid type id in types list: {}", token))
        })?;
        if id <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid type id in types list: {}",
                token
            )));
        }
        ids.push(TypeId::new(id));
    }
    if ids.is_empty() {
        return Err(AppError::BadRequest(
            "Query parameter types must list at least one id".into(),
        ));
    }
    Ok(ids)
}
