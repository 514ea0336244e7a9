use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        orders::OrderList,
        sav::{SavTicketList, UpdateSavTicketRequest},
        suggestions::SuggestionList,
    },
    error::AppResult,
    middleware::identity::CurrentUser,
    models::{Order, SavTicket},
    response::ApiResponse,
    routes::params::{OrderListQuery, TicketListQuery},
    services::admin_service,
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct AdminStats {
    /// Sum of order totals excluding cancelled orders, in FCFA.
    pub total_revenue: i64,
    pub total_orders: i64,
    pub orders_by_status: HashMap<String, i64>,
    pub tickets_by_status: HashMap<String, i64>,
    pub suggestion_count: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/sav-tickets", get(list_all_tickets))
        .route("/sav-tickets/{id}", patch(update_ticket))
        .route("/suggestions", get(list_suggestions))
        .route("/stats", get(dashboard_stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc by creation date")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order moved to the new status", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
    ),
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/sav-tickets",
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn list_all_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TicketListQuery>,
) -> AppResult<Json<ApiResponse<SavTicketList>>> {
    let resp = admin_service::list_all_tickets(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/sav-tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = UpdateSavTicketRequest,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<SavTicket>),
        (status = 409, description = "Ticket closed or transition not allowed"),
    ),
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn update_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSavTicketRequest>,
) -> AppResult<Json<ApiResponse<SavTicket>>> {
    let resp = admin_service::update_ticket(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/suggestions",
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn list_suggestions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<SuggestionList>>> {
    let resp = admin_service::list_suggestions(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard aggregates", body = ApiResponse<AdminStats>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("gateway_identity" = [])),
    tag = "Admin"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    let resp = admin_service::dashboard_stats(&state, &user).await?;
    Ok(Json(resp))
}
