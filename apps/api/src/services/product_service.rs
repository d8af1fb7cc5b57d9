//! Catalog service.
//!
//! Validates input and drives the product repository. Read operations are
//! open to any active user; write gating happens in the route layer.

use serde::Serialize;
use tracing::info;

use lavka_core::validation::{validate_price, validate_sku_code, validate_sku_name};
use lavka_core::{NewProduct, Product};
use lavka_db::{ProductFilter, ProductRepository};

use crate::error::{ApiError, ApiResult};

/// One page of catalog listing results.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    /// Total rows matching the filter (ignoring pagination).
    pub total: i64,

    /// The requested page.
    pub items: Vec<Product>,
}

/// Catalog service.
pub struct ProductService {
    products: ProductRepository,
}

impl ProductService {
    /// Create a new catalog service.
    pub fn new(products: ProductRepository) -> Self {
        ProductService { products }
    }

    /// Lists products with filtering, sorting and pagination.
    pub async fn get_products(&self, filter: &ProductFilter) -> ApiResult<ProductPage> {
        let total = self.products.count(filter).await?;
        let items = self.products.list(filter).await?;

        Ok(ProductPage { total, items })
    }

    /// Gets a product by id.
    pub async fn get_product(&self, id: i32) -> ApiResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product {}", id)))
    }

    /// Gets a product by barcode.
    pub async fn get_product_by_barcode(&self, barcode: &str) -> ApiResult<Product> {
        self.products
            .get_by_barcode(barcode)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product with barcode {}", barcode)))
    }

    /// Creates a product after validating and normalizing its fields.
    pub async fn create_product(&self, mut product: NewProduct) -> ApiResult<Product> {
        self.validate(&mut product)?;

        let created = self.products.insert(&product).await?;

        info!(id = created.id, sku_code = %created.sku_code, "Product created");

        Ok(created)
    }

    /// Updates an existing product.
    pub async fn update_product(&self, id: i32, mut product: NewProduct) -> ApiResult<Product> {
        self.validate(&mut product)?;

        let updated = self.products.update(id, &product).await?;

        info!(id = updated.id, "Product updated");

        Ok(updated)
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: i32) -> ApiResult<()> {
        self.products.delete(id).await?;

        info!(id = id, "Product deleted");

        Ok(())
    }

    /// Field validation shared by create and update. Normalizes the SKU
    /// code to its canonical uppercase form.
    fn validate(&self, product: &mut NewProduct) -> ApiResult<()> {
        product.sku_code = validate_sku_code(&product.sku_code)?;
        validate_sku_name(&product.sku_name)?;
        validate_price("cost_price", product.cost_price)?;
        validate_price("price", product.price)?;

        Ok(())
    }
}
