use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::sav::{CreateSavTicketRequest, SavTicketList},
    error::AppResult,
    middleware::identity::CurrentUser,
    models::SavTicket,
    response::ApiResponse,
    services::sav_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tickets).post(create_ticket))
}

#[utoipa::path(
    post,
    path = "/api/sav-tickets",
    request_body = CreateSavTicketRequest,
    responses(
        (status = 200, description = "Ticket opened", body = ApiResponse<SavTicket>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Order or order line not found for this user"),
    ),
    security(("gateway_identity" = [])),
    tag = "SAV"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateSavTicketRequest>,
) -> AppResult<Json<ApiResponse<SavTicket>>> {
    let resp = sav_service::create_ticket(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/sav-tickets", security(("gateway_identity" = [])), tag = "SAV")]
pub async fn list_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<SavTicketList>>> {
    let resp = sav_service::list_tickets(&state, &user).await?;
    Ok(Json(resp))
}
