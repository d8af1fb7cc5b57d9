//! # Catalog Seed Loader
//!
//! Idempotent bulk import of the initial product catalog from a CSV export.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Seed Load (one connection)                     │
//! │                                                                     │
//! │  1. CREATE TABLE IF NOT EXISTS products (... barcode UNIQUE ...)    │
//! │  2. CREATE TEMPORARY TABLE products_staging (same columns, no       │
//! │     constraints, no id)                                             │
//! │  3. COPY products_staging FROM STDIN (FORMAT csv, HEADER true)      │
//! │     ← the CSV file is streamed through the connection; parsing      │
//! │       happens inside PostgreSQL                                     │
//! │  4. INSERT INTO products (...) SELECT ... FROM products_staging     │
//! │     ON CONFLICT (barcode) DO NOTHING                                │
//! │                                                                     │
//! │  Temporary table is session-scoped: it dies with the connection.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Re-running the load against a non-empty table is a no-op for existing
//!   barcodes: the stored row wins, the incoming row is discarded
//!   (first-write-wins). No field of an existing row is ever updated.
//! - Every statement runs on one acquired connection, so the staging table
//!   never outlives the load.
//!
//! The same algorithm ships as declarative SQL in `scripts/init_catalog.sql`
//! for database-container initialization; this module is the programmatic
//! rendition used by the `seed` binary.

use std::path::Path;

use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};

/// Default CSV field delimiter. The upstream 1C export is
/// semicolon-separated because product names contain commas.
pub const DEFAULT_DELIMITER: char = ';';

/// Catalog table DDL, kept identical to the initial migration so the seed
/// can run against an empty database before the service ever starts.
const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id         SERIAL PRIMARY KEY,
    sku_code   TEXT NOT NULL,
    barcode    TEXT UNIQUE,
    unit       TEXT NOT NULL DEFAULT '',
    sku_name   TEXT NOT NULL DEFAULT '',
    status_1c  TEXT NOT NULL DEFAULT '',
    department TEXT NOT NULL DEFAULT '',
    group_name TEXT NOT NULL DEFAULT '',
    subgroup   TEXT,
    supplier   TEXT NOT NULL DEFAULT '',
    cost_price NUMERIC NOT NULL DEFAULT 0,
    price      NUMERIC NOT NULL DEFAULT 0
)
"#;

/// Staging table: same columns minus the surrogate id, no constraints, so
/// the raw file always loads.
const CREATE_STAGING_TABLE: &str = r#"
CREATE TEMPORARY TABLE products_staging (
    sku_code   TEXT,
    barcode    TEXT,
    unit       TEXT,
    sku_name   TEXT,
    status_1c  TEXT,
    department TEXT,
    group_name TEXT,
    subgroup   TEXT,
    supplier   TEXT,
    cost_price NUMERIC,
    price      NUMERIC
)
"#;

/// Copy from staging into the live table, discarding barcode collisions.
const INSERT_FROM_STAGING: &str = r#"
INSERT INTO products (
    sku_code, barcode, unit, sku_name, status_1c,
    department, group_name, subgroup, supplier,
    cost_price, price
)
SELECT
    sku_code, barcode, unit, sku_name, status_1c,
    department, group_name, subgroup, supplier,
    COALESCE(cost_price, 0), COALESCE(price, 0)
FROM products_staging
ON CONFLICT (barcode) DO NOTHING
"#;

/// Outcome of one seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows the CSV staged.
    pub staged: u64,

    /// Rows actually inserted into `products`.
    pub inserted: u64,

    /// Rows discarded because their barcode already existed.
    pub skipped: u64,
}

impl SeedReport {
    fn new(staged: u64, inserted: u64) -> Self {
        SeedReport {
            staged,
            inserted,
            skipped: staged.saturating_sub(inserted),
        }
    }
}

/// Builds the COPY statement for the staging load.
fn copy_statement(delimiter: char) -> String {
    format!(
        "COPY products_staging FROM STDIN WITH (FORMAT csv, HEADER true, DELIMITER '{}')",
        delimiter
    )
}

/// Loads the catalog CSV at `csv_path` into the `products` table.
///
/// Safe to re-run: rows whose barcode already exists are skipped, never
/// updated. Intended to run out-of-band, before the service accepts
/// traffic.
pub async fn load_catalog(pool: &PgPool, csv_path: &Path, delimiter: char) -> DbResult<SeedReport> {
    info!(path = %csv_path.display(), %delimiter, "Seeding product catalog");

    let contents = tokio::fs::read(csv_path)
        .await
        .map_err(|e| DbError::SeedInput(format!("{}: {}", csv_path.display(), e)))?;

    // One connection for the whole load: the temporary staging table is
    // connection-scoped.
    let mut conn = pool.acquire().await?;

    sqlx::query(CREATE_PRODUCTS_TABLE)
        .execute(&mut *conn)
        .await?;

    sqlx::query(CREATE_STAGING_TABLE)
        .execute(&mut *conn)
        .await?;

    let mut copy = conn.copy_in_raw(&copy_statement(delimiter)).await?;
    if let Err(e) = copy.send(contents).await {
        // Surface the Postgres parse error, not the aborted-copy follow-up.
        let _ = copy.abort("seed copy failed").await;
        return Err(e.into());
    }
    let staged = copy.finish().await?;

    let inserted = sqlx::query(INSERT_FROM_STAGING)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let report = SeedReport::new(staged, inserted);

    if report.skipped > 0 {
        warn!(
            skipped = report.skipped,
            "Catalog rows discarded on barcode conflict (existing rows kept)"
        );
    }

    info!(
        staged = report.staged,
        inserted = report.inserted,
        skipped = report.skipped,
        "Catalog seed complete"
    );

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_statement_default_delimiter() {
        assert_eq!(
            copy_statement(DEFAULT_DELIMITER),
            "COPY products_staging FROM STDIN WITH (FORMAT csv, HEADER true, DELIMITER ';')"
        );
    }

    #[test]
    fn test_copy_statement_custom_delimiter() {
        assert!(copy_statement(',').contains("DELIMITER ','"));
    }

    #[test]
    fn test_report_arithmetic() {
        let report = SeedReport::new(120, 100);
        assert_eq!(report.skipped, 20);

        // A fully-skipped re-run reports zero inserts, never underflows
        let rerun = SeedReport::new(120, 0);
        assert_eq!(rerun.skipped, 120);
    }

    #[test]
    fn test_staging_table_is_unconstrained() {
        assert!(CREATE_STAGING_TABLE.contains("TEMPORARY"));
        assert!(!CREATE_STAGING_TABLE.contains("UNIQUE"));
        assert!(!CREATE_STAGING_TABLE.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_insert_discards_conflicts_instead_of_updating() {
        assert!(INSERT_FROM_STAGING.contains("ON CONFLICT (barcode) DO NOTHING"));
        assert!(!INSERT_FROM_STAGING.contains("DO UPDATE"));
    }
}
