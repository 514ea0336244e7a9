use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::sav::{CreateSavTicketRequest, SavTicketList},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
        sav_tickets::{
            ActiveModel as TicketActive, Column as TicketCol, Entity as SavTickets,
            Model as TicketModel,
        },
    },
    error::{AppError, AppResult},
    middleware::identity::CurrentUser,
    models::SavTicket,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn build_ticket_number(ticket_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = ticket_id.simple().to_string();
    format!("SAV-{}-{}", date, &suffix[..8])
}

/// Open an after-sales ticket against one of the caller's order lines.
/// The order must belong to the caller and the line to the order; both
/// violations answer NotFound so foreign order ids are not confirmed to
/// exist.
pub async fn create_ticket(
    state: &AppState,
    user: &CurrentUser,
    payload: CreateSavTicketRequest,
) -> AppResult<ApiResponse<SavTicket>> {
    payload.validate()?;

    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(payload.order_id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let order_item = OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::Id.eq(payload.order_item_id))
                .add(OrderItemCol::OrderId.eq(order.id)),
        )
        .one(&state.orm)
        .await?;
    if order_item.is_none() {
        return Err(AppError::NotFound);
    }

    let ticket_id = Uuid::new_v4();
    let ticket = TicketActive {
        id: Set(ticket_id),
        ticket_number: Set(build_ticket_number(ticket_id)),
        user_id: Set(user.user_id),
        order_id: Set(payload.order_id),
        order_item_id: Set(payload.order_item_id),
        ticket_type: Set(payload.ticket_type.as_str().into()),
        status: Set("pending".into()),
        description: Set(payload.description),
        resolution: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "sav_ticket_create",
        Some("sav_tickets"),
        Some(serde_json::json!({
            "ticket_id": ticket.id,
            "ticket_number": ticket.ticket_number,
            "order_id": ticket.order_id,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Ticket created",
        ticket_from_entity(ticket),
        Some(Meta::empty()),
    ))
}

pub async fn list_tickets(
    state: &AppState,
    user: &CurrentUser,
) -> AppResult<ApiResponse<SavTicketList>> {
    let items: Vec<SavTicket> = SavTickets::find()
        .filter(TicketCol::UserId.eq(user.user_id))
        .order_by_desc(TicketCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ticket_from_entity)
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Tickets",
        SavTicketList { items },
        Some(meta),
    ))
}

pub(crate) fn ticket_from_entity(model: TicketModel) -> SavTicket {
    SavTicket {
        id: model.id,
        ticket_number: model.ticket_number,
        user_id: model.user_id,
        order_id: model.order_id,
        order_item_id: model.order_item_id,
        ticket_type: model.ticket_type,
        status: model.status,
        description: model.description,
        resolution: model.resolution,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
