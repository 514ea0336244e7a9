use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{ProductCategoryList, ProductList, ServiceCategoryList, ServiceList},
    error::AppResult,
    models::{Product, Service},
    response::ApiResponse,
    routes::params::{ProductQuery, ServiceQuery},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/product-categories", get(list_product_categories))
        .route("/services", get(list_services))
        .route("/services/{id}", get(get_service))
        .route("/service-categories", get(list_service_categories))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("brand" = Option<String>, Query, description = "Filter by brand"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in FCFA"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in FCFA"),
        ("in_stock" = Option<bool>, Query, description = "Filter by availability")
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/product-categories", tag = "Catalog")]
pub async fn list_product_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductCategoryList>>> {
    let resp = catalog_service::list_product_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("q" = Option<String>, Query, description = "Search in name and description")
    ),
    responses(
        (status = 200, description = "List services", body = ApiResponse<ServiceList>)
    ),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::get_service(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/service-categories", tag = "Catalog")]
pub async fn list_service_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ServiceCategoryList>>> {
    let resp = catalog_service::list_service_categories(&state).await?;
    Ok(Json(resp))
}
