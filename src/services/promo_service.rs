use crate::{
    error::{AppError, AppResult},
    models::PromoCode,
    response::ApiResponse,
    state::AppState,
};

/// Look up a promo code and check every validity condition in one query:
/// the code must be active, inside its validity window, above the minimum
/// order amount (when one is set), and under its usage limit (when one is
/// set). Validation has no side effects.
///
/// TODO: usage_count is read here but nothing increments it when an order
/// is placed with the code; whether redemption tracking is wanted is still
/// an open product decision.
pub async fn find_valid(
    state: &AppState,
    code: &str,
    order_amount: i64,
) -> AppResult<Option<PromoCode>> {
    let promo: Option<PromoCode> = sqlx::query_as(
        r#"
        SELECT * FROM promo_codes
        WHERE code = $1
          AND is_active = TRUE
          AND valid_from <= now()
          AND valid_until >= now()
          AND (min_order_amount IS NULL OR min_order_amount <= $2)
          AND (usage_limit IS NULL OR usage_count < usage_limit)
        "#,
    )
    .bind(code)
    .bind(order_amount)
    .fetch_optional(&state.pool)
    .await?;

    Ok(promo)
}

pub async fn validate_promo(
    state: &AppState,
    code: &str,
    order_amount: i64,
) -> AppResult<ApiResponse<PromoCode>> {
    match find_valid(state, code, order_amount).await? {
        Some(promo) => Ok(ApiResponse::success("Promo code valid", promo, None)),
        None => Err(AppError::NotFound),
    }
}

/// Resolve the discount a code grants on `base` (the order subtotal).
/// An absolute amount wins over a percentage; the result never exceeds the
/// base, so a total can never go negative.
pub fn discount_for(promo: &PromoCode, base: i64) -> i64 {
    let raw = if let Some(amount) = promo.discount_amount {
        amount
    } else if let Some(percent) = promo.discount_percent {
        base * i64::from(percent) / 100
    } else {
        0
    };
    raw.clamp(0, base)
}
