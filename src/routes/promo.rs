use axum::{Json, extract::State};

use crate::{
    dto::promo::ValidatePromoRequest, error::AppResult, models::PromoCode, response::ApiResponse,
    services::promo_service, state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/validate-promo",
    request_body = ValidatePromoRequest,
    responses(
        (status = 200, description = "Promo code valid for this amount", body = ApiResponse<PromoCode>),
        (status = 404, description = "Unknown, expired or not applicable"),
    ),
    tag = "Promo"
)]
pub async fn validate_promo(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePromoRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_service::validate_promo(&state, &payload.code, payload.order_amount).await?;
    Ok(Json(resp))
}
