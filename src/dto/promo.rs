use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidatePromoRequest {
    pub code: String,
    /// Order subtotal in FCFA the code would apply to.
    pub order_amount: i64,
}
