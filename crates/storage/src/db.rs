use larder_core::{InventoryItem, InventoryRecord, Quantity};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;

pub type DbPool = Pool<Sqlite>;

pub const DEFAULT_LIST_LIMIT: i64 = 100;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    // Locked database: give up after 10s.
    sqlx::query("PRAGMA busy_timeout = 10000")
        .execute(&pool)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create the inventory table when it is absent. Existing tables are left alone.
async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 0,
            quantity_unit TEXT,
            unit TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert all items in one transaction; returns the number of rows written.
pub async fn insert_inventory_items(
    pool: &DbPool,
    items: &[InventoryItem],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for item in items {
        let result = sqlx::query(
            "INSERT INTO inventory (product_name, quantity, quantity_unit, unit) VALUES (?, ?, ?, ?)",
        )
        .bind(&item.product_name)
        .bind(item.quantity.as_f64())
        .bind(&item.quantity_unit)
        .bind(&item.unit)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!("Inserted {inserted} rows into inventory");
    Ok(inserted)
}

/// Up to `limit` rows, newest first.
pub async fn list_inventory_items(
    pool: &DbPool,
    limit: i64,
) -> Result<Vec<InventoryRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<
        _,
        (i64, String, f64, Option<String>, Option<String>, Option<String>, Option<String>),
    >(
        "SELECT id, product_name, quantity, quantity_unit, unit, created_at, updated_at FROM inventory ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    tracing::info!("Retrieved {} inventory rows", rows.len());

    Ok(rows
        .into_iter()
        .map(|r| InventoryRecord {
            id: r.0,
            product_name: r.1,
            quantity: Quantity::from_f64(r.2),
            quantity_unit: r.3,
            unit: r.4,
            created_at: r.5,
            updated_at: r.6,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::QuantityUnit;

    async fn temp_db() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_db(&dir.path().join("inventory.db")).await.unwrap();
        (dir, pool)
    }

    fn sample_items() -> Vec<InventoryItem> {
        vec![
            InventoryItem::new("Chicken Breast").with_quantity(500, QuantityUnit::Grams),
            InventoryItem::new("Juice").with_unit("1l"),
            InventoryItem::new("Eggs").with_unit("dozen"),
        ]
    }

    #[tokio::test]
    async fn insert_reports_row_count() {
        let (_dir, pool) = temp_db().await;
        let n = insert_inventory_items(&pool, &sample_items()).await.unwrap();
        assert_eq!(n, 3);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (_dir, pool) = temp_db().await;
        insert_inventory_items(&pool, &sample_items()).await.unwrap();

        let rows = list_inventory_items(&pool, DEFAULT_LIST_LIMIT).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, ["Eggs", "Juice", "Chicken Breast"]);
        assert!(rows[0].id > rows[2].id);
    }

    #[tokio::test]
    async fn list_preserves_fields() {
        let (_dir, pool) = temp_db().await;
        insert_inventory_items(&pool, &sample_items()).await.unwrap();

        let rows = list_inventory_items(&pool, DEFAULT_LIST_LIMIT).await.unwrap();
        let chicken = rows.iter().find(|r| r.product_name == "Chicken Breast").unwrap();
        assert_eq!(chicken.quantity, Quantity::Whole(500));
        assert_eq!(chicken.quantity_unit.as_deref(), Some("g"));
        assert_eq!(chicken.unit, None);
        assert!(chicken.created_at.is_some());

        let juice = rows.iter().find(|r| r.product_name == "Juice").unwrap();
        assert_eq!(juice.unit.as_deref(), Some("1l"));
    }

    #[tokio::test]
    async fn list_honours_limit() {
        let (_dir, pool) = temp_db().await;
        insert_inventory_items(&pool, &sample_items()).await.unwrap();

        let rows = list_inventory_items(&pool, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Eggs");
    }

    #[tokio::test]
    async fn fractional_quantity_survives_storage() {
        let (_dir, pool) = temp_db().await;
        let item = InventoryItem {
            quantity: Quantity::Fractional(0.5),
            ..InventoryItem::new("Saffron")
        };
        insert_inventory_items(&pool, &[item]).await.unwrap();

        let rows = list_inventory_items(&pool, 1).await.unwrap();
        assert_eq!(rows[0].quantity, Quantity::Fractional(0.5));
    }

    #[tokio::test]
    async fn reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        {
            let pool = create_db(&path).await.unwrap();
            insert_inventory_items(&pool, &sample_items()).await.unwrap();
            pool.close().await;
        }
        let pool = create_db(&path).await.unwrap();
        assert_eq!(list_inventory_items(&pool, 10).await.unwrap().len(), 3);
    }
}
