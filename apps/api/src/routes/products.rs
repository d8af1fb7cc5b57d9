//! Catalog endpoints.
//!
//! Reads require an active authenticated user (no role restriction);
//! writes go through role gates:
//!
//! | Route                          | Gate                     |
//! |--------------------------------|--------------------------|
//! | GET /products                  | can_read_products        |
//! | GET /products/by-barcode/:bc   | can_read_products        |
//! | GET /products/:id              | can_read_products        |
//! | POST /products                 | admin OR manager         |
//! | PUT /products/:id              | admin OR manager         |
//! | DELETE /products/:id           | admin                    |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use lavka_core::{NewProduct, Product};
use lavka_db::ProductFilter;

use crate::deps::{admins_only, can_read_products, catalog_managers, ActiveUser};
use crate::error::ApiResult;
use crate::services::product_service::ProductPage;
use crate::services::Services;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/by-barcode/:barcode", get(get_product_by_barcode))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Lists catalog products with filtering, sorting and pagination.
async fn list_products(
    State(state): State<AppState>,
    user: ActiveUser,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<ProductPage>> {
    let _user = can_read_products(user);

    let page = Services::new(&state).product().get_products(&filter).await?;

    Ok(Json(page))
}

/// Looks a product up by barcode.
async fn get_product_by_barcode(
    State(state): State<AppState>,
    user: ActiveUser,
    Path(barcode): Path<String>,
) -> ApiResult<Json<Product>> {
    let _user = can_read_products(user);

    let product = Services::new(&state)
        .product()
        .get_product_by_barcode(&barcode)
        .await?;

    Ok(Json(product))
}

/// Gets a product by id.
async fn get_product(
    State(state): State<AppState>,
    user: ActiveUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Product>> {
    let _user = can_read_products(user);

    let product = Services::new(&state).product().get_product(id).await?;

    Ok(Json(product))
}

/// Creates a product. Requires the admin or manager role.
async fn create_product(
    State(state): State<AppState>,
    user: ActiveUser,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let user = catalog_managers().resolve(user)?;

    let product = Services::new(&state)
        .product()
        .create_product(payload)
        .await?;

    tracing::info!(
        id = product.id,
        username = %user.user().username,
        "Product created via API"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Updates a product. Requires the admin or manager role.
async fn update_product(
    State(state): State<AppState>,
    user: ActiveUser,
    Path(id): Path<i32>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    let _user = catalog_managers().resolve(user)?;

    let product = Services::new(&state)
        .product()
        .update_product(id, payload)
        .await?;

    Ok(Json(product))
}

/// Deletes a product. Admin only.
async fn delete_product(
    State(state): State<AppState>,
    user: ActiveUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let _user = admins_only().resolve(user)?;

    Services::new(&state).product().delete_product(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
