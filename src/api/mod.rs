pub mod costs;
pub mod health;
pub mod market;
pub mod materials;

use crate::config::Config;
use crate::pipeline::ValuationPipeline;
use crate::sde::SdeCatalog;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<SdeCatalog>,
    pub pipeline: Arc<ValuationPipeline>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<SdeCatalog>,
        pipeline: Arc<ValuationPipeline>,
    ) -> Self {
        Self {
            config,
            catalog,
            pipeline,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/materials", get(materials::get_materials))
        .route("/market", get(market::get_market))
        .route("/costs", get(costs::get_costs))
        .layer(cors)
        .with_state(state)
}
