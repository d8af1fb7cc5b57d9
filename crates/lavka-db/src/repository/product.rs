//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Filtered Listing
//! ```text
//! GET /products?search=хлеб&department=Бакалея&sort_by=price
//!      │
//!      ▼
//! ProductFilter { search, department, sort_by, ... }
//!      │
//!      ▼
//! QueryBuilder: SELECT ... WHERE TRUE
//!     AND (sku_name ILIKE $1 OR sku_code ILIKE $2 OR barcode ILIKE $3)
//!     AND department = $4
//!     ORDER BY price ASC LIMIT $5 OFFSET $6
//! ```
//!
//! Sort columns go through a whitelist; everything else is bound, never
//! interpolated.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use lavka_core::{NewProduct, Product};

use crate::error::{DbError, DbResult};

/// Columns accepted by `sort_by`. Anything else falls back to `id`.
const VALID_SORT_COLUMNS: &[&str] = &[
    "id",
    "sku_code",
    "sku_name",
    "price",
    "cost_price",
    "supplier",
    "department",
];

const PRODUCT_COLUMNS: &str = "id, sku_code, barcode, unit, sku_name, status_1c, \
     department, group_name, subgroup, supplier, cost_price, price";

/// Listing parameters, deserialized straight from the query string.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Rows to skip (pagination).
    pub skip: i64,

    /// Maximum rows to return.
    pub limit: i64,

    /// Substring matched against sku_name, sku_code and barcode.
    pub search: Option<String>,

    /// Sort column; must be in the whitelist.
    pub sort_by: Option<String>,

    /// "asc" (default) or "desc".
    pub sort_order: Option<String>,

    /// Exact department filter.
    pub department: Option<String>,

    /// Lower price bound, inclusive.
    pub min_price: Option<Decimal>,

    /// Upper price bound, inclusive.
    pub max_price: Option<Decimal>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            skip: 0,
            limit: 100,
            search: None,
            sort_by: None,
            sort_order: None,
            department: None,
            min_price: None,
            max_price: None,
        }
    }
}

/// A `products` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRecord {
    id: i32,
    sku_code: String,
    barcode: Option<String>,
    unit: String,
    sku_name: String,
    status_1c: String,
    department: String,
    group_name: String,
    subgroup: Option<String>,
    supplier: String,
    cost_price: Decimal,
    price: Decimal,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Product {
            id: r.id,
            sku_code: r.sku_code,
            barcode: r.barcode,
            unit: r.unit,
            sku_name: r.sku_name,
            status_1c: r.status_1c,
            department: r.department,
            group_name: r.group_name,
            subgroup: r.subgroup,
            supplier: r.supplier,
            cost_price: r.cost_price,
            price: r.price,
        }
    }
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products matching the filter, sorted and paginated.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));
        push_filters(&mut qb, filter);

        let (column, descending) = sort_spec(filter);
        qb.push(" ORDER BY ");
        qb.push(column);
        qb.push(if descending { " DESC" } else { " ASC" });

        qb.push(" LIMIT ");
        qb.push_bind(filter.limit.max(0));
        qb.push(" OFFSET ");
        qb.push_bind(filter.skip.max(0));

        let records = qb
            .build_query_as::<ProductRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Listing returned products");
        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Counts products matching the filter (ignoring pagination).
    pub async fn count(&self, filter: &ProductFilter) -> DbResult<i64> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM products WHERE TRUE");
        push_filters(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    /// Gets a product by its surrogate id.
    pub async fn get_by_id(&self, id: i32) -> DbResult<Option<Product>> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Product::from))
    }

    /// Gets a product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = $1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Product::from))
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - inserted row with its assigned id
    /// * `Err(DbError::UniqueViolation)` - barcode already exists
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(sku_code = %product.sku_code, "Inserting product");

        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            INSERT INTO products (
                sku_code, barcode, unit, sku_name, status_1c,
                department, group_name, subgroup, supplier,
                cost_price, price
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.sku_code)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(&product.sku_name)
        .bind(&product.status_1c)
        .bind(&product.department)
        .bind(&product.group_name)
        .bind(&product.subgroup)
        .bind(&product.supplier)
        .bind(product.cost_price)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - updated row
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn update(&self, id: i32, product: &NewProduct) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            UPDATE products SET
                sku_code = $2,
                barcode = $3,
                unit = $4,
                sku_name = $5,
                status_1c = $6,
                department = $7,
                group_name = $8,
                subgroup = $9,
                supplier = $10,
                cost_price = $11,
                price = $12
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&product.sku_code)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(&product.sku_name)
        .bind(&product.status_1c)
        .bind(&product.department)
        .bind(&product.group_name)
        .bind(&product.subgroup)
        .bind(&product.supplier)
        .bind(product.cost_price)
        .bind(product.price)
        .fetch_optional(&self.pool)
        .await?;

        record
            .map(Product::from)
            .ok_or_else(|| DbError::not_found("Product", id.to_string()))
    }

    /// Deletes a product.
    pub async fn delete(&self, id: i32) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }
}

/// Appends the filter's WHERE conditions, binding every value.
fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &ProductFilter) {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let term = format!("%{}%", search.trim());
        qb.push(" AND (sku_name ILIKE ");
        qb.push_bind(term.clone());
        qb.push(" OR sku_code ILIKE ");
        qb.push_bind(term.clone());
        qb.push(" OR barcode ILIKE ");
        qb.push_bind(term);
        qb.push(")");
    }

    if let Some(department) = filter.department.as_deref() {
        qb.push(" AND department = ");
        qb.push_bind(department.to_string());
    }

    if let Some(min_price) = filter.min_price {
        qb.push(" AND price >= ");
        qb.push_bind(min_price);
    }

    if let Some(max_price) = filter.max_price {
        qb.push(" AND price <= ");
        qb.push_bind(max_price);
    }
}

/// Resolves the sort column (whitelisted) and direction.
fn sort_spec(filter: &ProductFilter) -> (&'static str, bool) {
    let column = filter
        .sort_by
        .as_deref()
        .and_then(|requested| {
            VALID_SORT_COLUMNS
                .iter()
                .find(|&&allowed| allowed == requested)
        })
        .copied()
        .unwrap_or("id");

    let descending = filter
        .sort_order
        .as_deref()
        .is_some_and(|order| order.eq_ignore_ascii_case("desc"));

    (column, descending)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = ProductFilter::default();
        assert_eq!(filter.skip, 0);
        assert_eq!(filter.limit, 100);
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_sort_spec_whitelist() {
        let mut filter = ProductFilter {
            sort_by: Some("price".to_string()),
            sort_order: Some("DESC".to_string()),
            ..Default::default()
        };
        assert_eq!(sort_spec(&filter), ("price", true));

        // Unknown columns fall back to id ascending
        filter.sort_by = Some("1; DROP TABLE products".to_string());
        filter.sort_order = None;
        assert_eq!(sort_spec(&filter), ("id", false));
    }

    #[test]
    fn test_push_filters_binds_search_and_bounds() {
        let filter = ProductFilter {
            search: Some("хлеб".to_string()),
            department: Some("Бакалея".to_string()),
            min_price: Some(Decimal::new(100, 0)),
            ..Default::default()
        };

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 WHERE TRUE");
        push_filters(&mut qb, &filter);

        let sql = qb.sql();
        assert!(sql.contains("sku_name ILIKE $1"));
        assert!(sql.contains("barcode ILIKE $3"));
        assert!(sql.contains("department = $4"));
        assert!(sql.contains("price >= $5"));
        assert!(!sql.contains("хлеб"));
    }

    #[test]
    fn test_push_filters_skips_blank_search() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 WHERE TRUE");
        push_filters(&mut qb, &filter);

        assert_eq!(qb.sql(), "SELECT 1 WHERE TRUE");
    }
}
