use makebuy::provider::{CachedMarketSource, EsiMarketSource, MarketSource};
use makebuy::{api, config::Config, SdeCatalog, ValuationPipeline};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Open the static data export and wire up market data
    let catalog = match SdeCatalog::open(&config.sde_path).await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to open static data export: {}", e);
            std::process::exit(1);
        }
    };

    let esi = EsiMarketSource::new(config.esi_base_url.clone());
    let source: Arc<dyn MarketSource> =
        Arc::new(CachedMarketSource::new(Arc::new(esi), config.snapshot_ttl));
    let pipeline = Arc::new(ValuationPipeline::new(
        Arc::clone(&catalog),
        Arc::clone(&source),
        config.tuning,
    ));

    // Warm the universe-wide snapshots so the first request does not pay
    // for them. Failures here are not fatal, requests retry on demand.
    let warmup = Arc::clone(&source);
    tokio::spawn(async move {
        if let Err(e) = warmup.adjusted_prices().await {
            tracing::warn!("Adjusted price warmup failed: {}", e);
        }
        if let Err(e) = warmup.system_cost_indices().await {
            tracing::warn!("Cost index warmup failed: {}", e);
        }
    });

    // Create router
    let app = api::create_router(api::AppState::new(config, catalog, pipeline));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
