use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        orders::OrderList,
        sav::{SavTicketList, UpdateSavTicketRequest},
        suggestions::SuggestionList,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        sav_tickets::{ActiveModel as TicketActive, Column as TicketCol, Entity as SavTickets},
    },
    error::{AppError, AppResult},
    middleware::identity::{CurrentUser, ensure_admin},
    models::{Order, OrderStatus, SavTicket, SavTicketStatus, Suggestion},
    response::{ApiResponse, Meta},
    routes::admin::{AdminStats, UpdateOrderStatusRequest},
    routes::params::{OrderListQuery, SortOrder, TicketListQuery},
    services::{order_service, sav_service},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &CurrentUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_service::order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// The only code path that moves an order's status. Transitions follow the
/// lifecycle in models::OrderStatus: forward only, cancellation from any
/// non-terminal state, terminal states frozen.
pub async fn update_order_status(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let next = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation("unknown order status".to_string()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = OrderStatus::parse(&existing.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order has unknown status")))?;
    if !current.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(next.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_service::order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn list_all_tickets(
    state: &AppState,
    user: &CurrentUser,
    query: TicketListQuery,
) -> AppResult<ApiResponse<SavTicketList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(TicketCol::Status.eq(status.clone()));
    }

    let finder = SavTickets::find()
        .filter(condition)
        .order_by_desc(TicketCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<SavTicket> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(sav_service::ticket_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Tickets",
        SavTicketList { items },
        Some(meta),
    ))
}

/// Advance a ticket and/or record its resolution. Ticket statuses only move
/// forward; a closed ticket accepts no further changes.
pub async fn update_ticket(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    payload: UpdateSavTicketRequest,
) -> AppResult<ApiResponse<SavTicket>> {
    ensure_admin(user)?;

    if payload.status.is_none() && payload.resolution.is_none() {
        return Err(AppError::Validation(
            "status or resolution must be provided".to_string(),
        ));
    }

    let existing = SavTickets::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let current = SavTicketStatus::parse(&existing.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("ticket has unknown status")))?;
    if current == SavTicketStatus::Closed {
        return Err(AppError::Conflict("ticket is closed".to_string()));
    }

    let mut active: TicketActive = existing.into();

    if let Some(status) = payload.status.as_deref() {
        let next = SavTicketStatus::parse(status)
            .ok_or_else(|| AppError::Validation("unknown ticket status".to_string()))?;
        if !current.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "cannot move ticket from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }
        active.status = Set(next.as_str().into());
    }

    if let Some(resolution) = payload.resolution {
        active.resolution = Set(Some(resolution));
    }

    active.updated_at = Set(Utc::now().into());
    let ticket = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "sav_ticket_update",
        Some("sav_tickets"),
        Some(serde_json::json!({ "ticket_id": ticket.id, "status": ticket.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Ticket updated",
        sav_service::ticket_from_entity(ticket),
        Some(Meta::empty()),
    ))
}

pub async fn list_suggestions(
    state: &AppState,
    user: &CurrentUser,
) -> AppResult<ApiResponse<SuggestionList>> {
    ensure_admin(user)?;

    let items: Vec<Suggestion> =
        sqlx::query_as("SELECT * FROM suggestions ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success(
        "Suggestions",
        SuggestionList { items },
        Some(meta),
    ))
}

/// Dashboard figures computed on demand from the base tables; there is no
/// maintained counter to drift out of sync.
pub async fn dashboard_stats(
    state: &AppState,
    user: &CurrentUser,
) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(user)?;

    let revenue: (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0) FROM orders WHERE status <> 'cancelled'",
    )
    .fetch_one(&state.pool)
    .await?;

    let order_counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM orders GROUP BY status")
            .fetch_all(&state.pool)
            .await?;

    let ticket_counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM sav_tickets GROUP BY status")
            .fetch_all(&state.pool)
            .await?;

    let suggestion_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM suggestions")
        .fetch_one(&state.pool)
        .await?;

    let total_orders = order_counts.iter().map(|(_, n)| n).sum();
    let orders_by_status: HashMap<String, i64> = order_counts.into_iter().collect();
    let tickets_by_status: HashMap<String, i64> = ticket_counts.into_iter().collect();

    let stats = AdminStats {
        total_revenue: revenue.0,
        total_orders,
        orders_by_status,
        tickets_by_status,
        suggestion_count: suggestion_count.0,
    };

    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}
