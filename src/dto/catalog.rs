use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Product, ProductCategory, Service, ServiceCategory};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCategoryList {
    pub items: Vec<ProductCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCategoryList {
    pub items: Vec<ServiceCategory>,
}
