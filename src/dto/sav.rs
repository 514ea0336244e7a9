use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::SavTicket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SavTicketType {
    DefectiveProduct,
    DamagedDelivery,
    WrongProduct,
    ChangeOfMind,
    Other,
}

impl SavTicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavTicketType::DefectiveProduct => "defective_product",
            SavTicketType::DamagedDelivery => "damaged_delivery",
            SavTicketType::WrongProduct => "wrong_product",
            SavTicketType::ChangeOfMind => "change_of_mind",
            SavTicketType::Other => "other",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSavTicketRequest {
    pub order_id: Uuid,
    pub order_item_id: Uuid,
    #[serde(rename = "type")]
    pub ticket_type: SavTicketType,
    #[validate(length(min = 10, message = "description must be at least 10 characters"))]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSavTicketRequest {
    pub status: Option<String>,
    pub resolution: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavTicketList {
    pub items: Vec<SavTicket>,
}
