use axum::http::StatusCode;
use makebuy::api::{self, AppState};
use makebuy::config::Config;
use makebuy::domain::{
    ActivityCostIndex, Decimal, LocationId, MarketOrder, RegionId, SystemCostIndices, SystemId,
    TypeId,
};
use makebuy::engine::ValuationTuning;
use makebuy::provider::MockMarketSource;
use makebuy::{SdeCatalog, ValuationPipeline};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const HUB_REGION: i64 = 10000002;
const HUB_STATION: i64 = 60003760;
const BUILD_SYSTEM: i64 = 30004759;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn order(type_id: i64, is_buy: bool, price: &str) -> MarketOrder {
    MarketOrder {
        order_id: 0,
        type_id: TypeId::new(type_id),
        location_id: LocationId::new(HUB_STATION),
        is_buy_order: is_buy,
        price: dec(price),
        volume_remain: 1000,
        issued: "2026-08-20T14:00:00Z".parse().unwrap(),
    }
}

async fn setup_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("sde.db")
        .to_string_lossy()
        .to_string();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .expect("fixture db failed to open");

    for ddl in [
        "CREATE TABLE industryActivityProducts (
            typeID INTEGER, activityID INTEGER, productTypeID INTEGER, quantity INTEGER
        )",
        "CREATE TABLE industryActivityMaterials (
            typeID INTEGER, activityID INTEGER, materialTypeID INTEGER, quantity INTEGER
        )",
        "CREATE TABLE invTypes (typeID INTEGER PRIMARY KEY, typeName TEXT)",
        "INSERT INTO industryActivityProducts VALUES (687, 1, 587, 1)",
        "INSERT INTO industryActivityMaterials VALUES (687, 1, 34, 3)",
        "INSERT INTO industryActivityMaterials VALUES (687, 1, 35, 5)",
        "INSERT INTO invTypes VALUES (587, 'Rifter')",
        "INSERT INTO invTypes VALUES (34, 'Tritanium')",
        "INSERT INTO invTypes VALUES (35, 'Pyerite')",
    ] {
        sqlx::query(ddl).execute(&pool).await.expect("seed failed");
    }

    let region = RegionId::new(HUB_REGION);
    let mock = MockMarketSource::new()
        .with_order(region, order(34, true, "10"))
        .with_order(region, order(35, true, "4"))
        .with_adjusted_price(TypeId::new(587), dec("50"))
        .with_adjusted_price(TypeId::new(34), dec("50"))
        .with_adjusted_price(TypeId::new(35), dec("50"))
        .with_system(SystemCostIndices {
            solar_system_id: SystemId::new(BUILD_SYSTEM),
            cost_indices: vec![ActivityCostIndex {
                activity: "manufacturing".to_string(),
                cost_index: dec("0.2"),
            }],
        });

    let config = Config {
        port: 0,
        sde_path: db_path,
        esi_base_url: "http://example.invalid".to_string(),
        highsec_region: region,
        highsec_station: LocationId::new(HUB_STATION),
        build_system: SystemId::new(BUILD_SYSTEM),
        snapshot_ttl: None,
        tuning: ValuationTuning::default(),
    };

    let catalog = Arc::new(SdeCatalog::new(pool));
    let pipeline = Arc::new(ValuationPipeline::new(
        Arc::clone(&catalog),
        Arc::new(mock),
        config.tuning,
    ));
    let app = api::create_router(AppState::new(config, catalog, pipeline));

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn request(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, body)
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_app().await;

    let (status, body) = request(test_app.app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");

    let (status, body) = request(test_app.app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ready");
}

#[tokio::test]
async fn test_all_three_endpoints_answer_from_one_app() {
    let test_app = setup_app().await;

    let (status, body) = request(test_app.app.clone(), "/materials?type=587").await;
    assert_eq!(status, StatusCode::OK);
    let materials: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        materials["587"]["valuation"]["unitCost"],
        serde_json::json!(133.0)
    );

    let (status, body) = request(test_app.app.clone(), "/market?types=34,35").await;
    assert_eq!(status, StatusCode::OK);
    let market: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(market["34"]["buy"], serde_json::json!(10.0));
    assert!(market["34"].get("valuation").is_none());

    let (status, body) = request(test_app.app, "/costs").await;
    assert_eq!(status, StatusCode::OK);
    let costs: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(costs[0]["solar_system_id"], BUILD_SYSTEM);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let test_app = setup_app().await;

    let (status, _) = request(test_app.app, "/v1/materials").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
