use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::suggestions::CreateSuggestionRequest,
    error::AppResult,
    models::Suggestion,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Append-only feedback intake. Anonymous callers are allowed; only the
/// payload is validated.
pub async fn create_suggestion(
    state: &AppState,
    payload: CreateSuggestionRequest,
) -> AppResult<ApiResponse<Suggestion>> {
    payload.validate()?;

    let suggestion: Suggestion = sqlx::query_as(
        r#"
        INSERT INTO suggestions (id, name, email, subject, category, message)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.subject)
    .bind(payload.category.as_str())
    .bind(payload.message)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Suggestion received",
        suggestion,
        Some(Meta::empty()),
    ))
}
