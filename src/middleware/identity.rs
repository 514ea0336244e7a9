use axum::extract::FromRequestParts;
use uuid::Uuid;

use crate::error::AppError;

/// Identity resolved by the upstream authentication gateway, which forwards
/// `x-user-id` and `x-user-role` headers on every authenticated request.
/// The API treats the id as an opaque required input; it never performs
/// session validation itself.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &CurrentUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &CurrentUser) -> Result<(), AppError> {
    ensure_role(user, "admin")
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let id_header = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| AppError::Validation("Missing x-user-id header".into()))?;

        let id_str = id_header
            .to_str()
            .map_err(|_| AppError::Validation("Invalid x-user-id header".into()))?;

        let user_id = Uuid::parse_str(id_str)
            .map_err(|_| AppError::Validation("x-user-id is not a valid UUID".into()))?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("customer")
            .to_string();

        Ok(CurrentUser { user_id, role })
    }
}
