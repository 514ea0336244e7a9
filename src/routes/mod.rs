use axum::{Router, routing::post};

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod promo;
pub mod sav;
pub mod suggestions;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .route("/validate-promo", post(promo::validate_promo))
        .nest("/sav-tickets", sav::router())
        .nest("/suggestions", suggestions::router())
        .nest("/admin", admin::router())
}
