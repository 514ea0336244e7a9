use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Products,
    Services,
    Website,
    Delivery,
    Sav,
    Other,
}

impl SuggestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::Products => "products",
            SuggestionCategory::Services => "services",
            SuggestionCategory::Website => "website",
            SuggestionCategory::Delivery => "delivery",
            SuggestionCategory::Sav => "sav",
            SuggestionCategory::Other => "other",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSuggestionRequest {
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    pub category: SuggestionCategory,
    #[validate(length(min = 10, message = "message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionList {
    pub items: Vec<Suggestion>,
}
