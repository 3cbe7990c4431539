//! Multi-level valuation through the real pipeline: a manufactured root
//! consuming a reacted intermediate consuming a bought leaf.

use makebuy::domain::{
    ActivityCostIndex, Decimal, LocationId, MarketOrder, RegionId, SystemCostIndices, SystemId,
    TradeHub, TypeId,
};
use makebuy::engine::ValuationTuning;
use makebuy::provider::MockMarketSource;
use makebuy::{SdeCatalog, ValuationPipeline};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tempfile::TempDir;

const HUB_REGION: i64 = 10000002;
const HUB_STATION: i64 = 60003760;
const BUILD_SYSTEM: i64 = 30004759;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn hub() -> TradeHub {
    TradeHub::new(RegionId::new(HUB_REGION), LocationId::new(HUB_STATION))
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

/// Root 587 manufactures from 3x intermediate 900; 900 reacts from 4x
/// leaf 34. Output quantity one everywhere.
async fn chain_pipeline(dir: &TempDir, mock: MockMarketSource) -> ValuationPipeline {
    let db_path = dir.path().join("sde.db").to_string_lossy().to_string();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .expect("fixture db failed to open");

    for sql in [
        "CREATE TABLE industryActivityProducts (
            typeID INTEGER, activityID INTEGER, productTypeID INTEGER, quantity INTEGER
        )",
        "CREATE TABLE industryActivityMaterials (
            typeID INTEGER, activityID INTEGER, materialTypeID INTEGER, quantity INTEGER
        )",
        "CREATE TABLE invTypes (typeID INTEGER PRIMARY KEY, typeName TEXT)",
        "INSERT INTO industryActivityProducts VALUES (687, 1, 587, 1)",
        "INSERT INTO industryActivityMaterials VALUES (687, 1, 900, 3)",
        "INSERT INTO industryActivityProducts VALUES (901, 11, 900, 1)",
        "INSERT INTO industryActivityMaterials VALUES (901, 11, 34, 4)",
        "INSERT INTO invTypes VALUES (587, 'Rifter')",
        "INSERT INTO invTypes VALUES (900, 'Fullerides')",
        "INSERT INTO invTypes VALUES (34, 'Tritanium')",
    ] {
        sqlx::query(sql).execute(&pool).await.expect("seed failed");
    }

    let catalog = Arc::new(SdeCatalog::new(pool));
    ValuationPipeline::new(catalog, Arc::new(mock), ValuationTuning::default())
}

/// Books and reference prices for the whole chain. The build system carries
/// both a manufacturing index and the feed's singular "reaction" label.
fn chain_market(intermediate_buy: &str) -> MockMarketSource {
    let region = RegionId::new(HUB_REGION);
    MockMarketSource::new()
        .with_order(region, order(34, true, "10"))
        .with_order(region, order(900, true, intermediate_buy))
        .with_order(region, order(587, false, "180"))
        .with_adjusted_price(TypeId::new(587), dec("50"))
        .with_adjusted_price(TypeId::new(900), dec("30"))
        .with_adjusted_price(TypeId::new(34), dec("2"))
        .with_system(SystemCostIndices {
            solar_system_id: SystemId::new(BUILD_SYSTEM),
            cost_indices: vec![
                ActivityCostIndex {
                    activity: "manufacturing".to_string(),
                    cost_index: dec("0.2"),
                },
                ActivityCostIndex {
                    activity: "reaction".to_string(),
                    cost_index: dec("0.05"),
                },
            ],
        })
}

#[tokio::test]
async fn test_chain_values_intermediate_and_root() {
    let dir = TempDir::new().unwrap();
    let pipeline = chain_pipeline(&dir, chain_market("38")).await;

    let nodes = pipeline
        .materials(TypeId::new(587), hub(), SystemId::new(BUILD_SYSTEM))
        .await
        .unwrap();
    assert_eq!(nodes.len(), 3);

    // Reaction: no material efficiency, index 0.05.
    // material = 4 * 10, base = 4 * 2, fees = 8 * 0.05 * 1.1.
    let intermediate = nodes[&TypeId::new(900)].valuation.as_ref().unwrap();
    assert_eq!(intermediate.material_cost, Some(dec("40")));
    assert_eq!(intermediate.job_base_cost, Some(dec("8")));
    assert_eq!(intermediate.cost_index, Some(dec("0.05")));
    assert_eq!(intermediate.job_fees, Some(dec("0.44")));
    assert_eq!(intermediate.unit_cost, Some(dec("40.44")));

    // Buying the intermediate at 38 beats building it at 40.44, so the
    // root's material bill uses the hub price.
    // material = 2.7 * 38, base = 3 * 30, fees = 90 * 0.2 * 1.1.
    let root = nodes[&TypeId::new(587)].valuation.as_ref().unwrap();
    assert_eq!(root.material_cost, Some(dec("102.6")));
    assert_eq!(root.job_base_cost, Some(dec("90")));
    assert_eq!(root.job_fees, Some(dec("19.8")));
    assert_eq!(root.unit_cost, Some(dec("122.4")));
    // margin = (180 - 122.4) / 180
    assert_eq!(root.margin, Some(dec("0.32")));
}

#[tokio::test]
async fn test_chain_prefers_building_expensive_intermediate() {
    let dir = TempDir::new().unwrap();
    let pipeline = chain_pipeline(&dir, chain_market("45")).await;

    let nodes = pipeline
        .materials(TypeId::new(587), hub(), SystemId::new(BUILD_SYSTEM))
        .await
        .unwrap();

    // Hub asks 45 but building costs 40.44, so the root pays 2.7 * 40.44.
    let root = nodes[&TypeId::new(587)].valuation.as_ref().unwrap();
    assert_eq!(root.material_cost, Some(dec("109.188")));
    assert_eq!(root.unit_cost, Some(dec("128.988")));
}

#[tokio::test]
async fn test_chain_nodes_carry_their_graph_links() {
    let dir = TempDir::new().unwrap();
    let pipeline = chain_pipeline(&dir, chain_market("38")).await;

    let nodes = pipeline
        .materials(TypeId::new(587), hub(), SystemId::new(BUILD_SYSTEM))
        .await
        .unwrap();

    let root = &nodes[&TypeId::new(587)];
    assert_eq!(root.inputs.get(&TypeId::new(900)), Some(&3));
    assert!(root.outputs.is_empty());

    let intermediate = &nodes[&TypeId::new(900)];
    assert_eq!(intermediate.name.as_deref(), Some("Fullerides"));
    assert_eq!(intermediate.inputs.get(&TypeId::new(34)), Some(&4));
    assert_eq!(intermediate.outputs.get(&TypeId::new(587)), Some(&3));

    let leaf = &nodes[&TypeId::new(34)];
    assert!(leaf.is_leaf());
    assert_eq!(leaf.outputs.get(&TypeId::new(900)), Some(&4));
    assert_eq!(leaf.adjusted_price, Some(dec("2")));
}
