//! Read-only access to the static data export (SDE).
//!
//! The SDE is a prebuilt SQLite database shipping the game's item catalog
//! and blueprint tables. This module pulls recipe closures and display
//! names out of it; nothing here ever writes.

use crate::domain::{Activity, TypeId};
use crate::engine::RecipeRow;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use tracing::info;

/// Blueprint rows for every buildable type reachable from one root.
///
/// When several blueprints produce the same type the lowest blueprint id
/// wins, so results are stable across runs against the same export.
const CLOSURE_SQL: &str = r#"
WITH RECURSIVE
recipes AS (
    SELECT p.typeID AS blueprint_id,
           p.activityID AS activity_id,
           p.productTypeID AS output_id,
           p.quantity AS output_quantity
    FROM industryActivityProducts p
    WHERE p.activityID IN (1, 11)
      AND p.typeID = (
          SELECT MIN(q.typeID)
          FROM industryActivityProducts q
          WHERE q.productTypeID = p.productTypeID
            AND q.activityID IN (1, 11)
      )
),
closure(output_id) AS (
    SELECT ?
    UNION
    SELECT m.materialTypeID
    FROM closure c
    JOIN recipes r ON r.output_id = c.output_id
    JOIN industryActivityMaterials m
      ON m.typeID = r.blueprint_id AND m.activityID = r.activity_id
)
SELECT r.output_id,
       r.output_quantity,
       r.activity_id,
       m.materialTypeID AS input_id,
       m.quantity AS input_quantity
FROM closure c
JOIN recipes r ON r.output_id = c.output_id
JOIN industryActivityMaterials m
  ON m.typeID = r.blueprint_id AND m.activityID = r.activity_id
ORDER BY r.output_id, m.materialTypeID
"#;

/// Catalog queries against the static data export.
pub struct SdeCatalog {
    pool: SqlitePool,
}

impl SdeCatalog {
    /// Wrap an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        SdeCatalog { pool }
    }

    /// Open the export read-only.
    pub async fn open(db_path: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{}?mode=ro", db_path))
            .await?;
        info!("Opened static data export at {}", db_path);
        Ok(SdeCatalog { pool })
    }

    /// Cheap liveness probe against the export.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Every recipe row reachable from `root`: the root's recipe, its
    /// buildable inputs' recipes, and so on. Empty when the root has no
    /// manufacturing or reaction blueprint.
    pub async fn recipe_closure(&self, root: TypeId) -> Result<Vec<RecipeRow>, sqlx::Error> {
        let rows = sqlx::query(CLOSURE_SQL)
            .bind(root.as_i64())
            .fetch_all(&self.pool)
            .await?;

        let mut recipe_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            let activity_id: i64 = row.get("activity_id");
            let activity = match Activity::from_sde_id(activity_id) {
                Some(activity) => activity,
                None => continue,
            };
            recipe_rows.push(RecipeRow {
                output_id: TypeId::new(row.get("output_id")),
                output_quantity: row.get("output_quantity"),
                activity,
                input_id: TypeId::new(row.get("input_id")),
                input_quantity: row.get("input_quantity"),
            });
        }
        Ok(recipe_rows)
    }

    /// Look up display names for a set of types. Types the catalog does not
    /// know are simply absent from the result.
    pub async fn type_names(
        &self,
        ids: &[TypeId],
    ) -> Result<HashMap<TypeId, String>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT typeID, typeName FROM invTypes WHERE typeID IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.as_i64());
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| (TypeId::new(row.get("typeID")), row.get("typeName")))
            .collect())
    }
}
