use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::catalog::{ProductCategoryList, ProductList, ServiceCategoryList, ServiceList},
    entity::{
        product_categories::{
            Column as ProductCatCol, Entity as ProductCategories, Model as ProductCategoryModel,
        },
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        service_categories::{
            Column as ServiceCatCol, Entity as ServiceCategories, Model as ServiceCategoryModel,
        },
        services::{Column as SvcCol, Entity as Services, Model as ServiceModel},
    },
    error::{AppError, AppResult},
    models::{Product, ProductCategory, Service, ServiceCategory},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ServiceQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();

    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ProdCol::Name).ilike(pattern.clone()))
                .add(Expr::col(ProdCol::Description).ilike(pattern)),
        );
    }

    if let Some(brand) = query.brand.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ProdCol::Brand.eq(brand.clone()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(ProdCol::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(ProdCol::Price.lte(max_price));
    }

    if let Some(in_stock) = query.in_stock {
        condition = condition.add(ProdCol::InStock.eq(in_stock));
    }

    let items: Vec<Product> = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn list_product_categories(
    state: &AppState,
) -> AppResult<ApiResponse<ProductCategoryList>> {
    let items: Vec<ProductCategory> = ProductCategories::find()
        .order_by_asc(ProductCatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_category_from_entity)
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Product categories",
        ProductCategoryList { items },
        Some(meta),
    ))
}

pub async fn list_services(
    state: &AppState,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let mut condition = Condition::all();

    if let Some(category_id) = query.category_id {
        condition = condition.add(SvcCol::CategoryId.eq(category_id));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(SvcCol::Name).ilike(pattern.clone()))
                .add(Expr::col(SvcCol::Description).ilike(pattern)),
        );
    }

    let items: Vec<Service> = Services::find()
        .filter(condition)
        .order_by_desc(SvcCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_from_entity)
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(meta),
    ))
}

pub async fn get_service(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Service>> {
    let service = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(service_from_entity);
    let service = match service {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Service", service, None))
}

pub async fn list_service_categories(
    state: &AppState,
) -> AppResult<ApiResponse<ServiceCategoryList>> {
    let items: Vec<ServiceCategory> = ServiceCategories::find()
        .order_by_asc(ServiceCatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_category_from_entity)
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Service categories",
        ServiceCategoryList { items },
        Some(meta),
    ))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        specs: model.specs,
        price: model.price,
        image_url: model.image_url,
        category_id: model.category_id,
        brand: model.brand,
        in_stock: model.in_stock,
        is_hot: model.is_hot,
        is_new: model.is_new,
        rating: model.rating,
        review_count: model.review_count,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn service_from_entity(model: ServiceModel) -> Service {
    Service {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        image_url: model.image_url,
        category_id: model.category_id,
        is_new: model.is_new,
        rating: model.rating,
        review_count: model.review_count,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn product_category_from_entity(model: ProductCategoryModel) -> ProductCategory {
    ProductCategory {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn service_category_from_entity(model: ServiceCategoryModel) -> ServiceCategory {
    ServiceCategory {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
