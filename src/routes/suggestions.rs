use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::suggestions::CreateSuggestionRequest, error::AppResult, models::Suggestion,
    response::ApiResponse, services::suggestion_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_suggestion))
}

#[utoipa::path(
    post,
    path = "/api/suggestions",
    request_body = CreateSuggestionRequest,
    responses(
        (status = 200, description = "Suggestion recorded", body = ApiResponse<Suggestion>),
        (status = 400, description = "Invalid payload"),
    ),
    tag = "Suggestions"
)]
pub async fn create_suggestion(
    State(state): State<AppState>,
    Json(payload): Json<CreateSuggestionRequest>,
) -> AppResult<Json<ApiResponse<Suggestion>>> {
    let resp = suggestion_service::create_suggestion(&state, payload).await?;
    Ok(Json(resp))
}
