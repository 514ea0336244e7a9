use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::{Column as ProdCol, Entity as Products},
        services::{Column as SvcCol, Entity as Services},
    },
    error::{AppError, AppResult},
    middleware::identity::CurrentUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::promo_service,
    state::AppState,
};

/// Flat-fee shipping: charged whenever there is something to ship, zero on a
/// zero subtotal.
pub fn shipping_cost_for(subtotal: i64, flat_fee: i64) -> i64 {
    if subtotal > 0 { flat_fee } else { 0 }
}

/// Human-legible order number: date for the back office, uuid prefix for
/// uniqueness. The orders.order_number unique constraint is the backstop.
pub fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("CMD-{}-{}", date, &suffix[..8])
}

/// Convert the caller's cart into an order. Price hydration, order insert,
/// order-item snapshots and the cart wipe all run inside one transaction;
/// any failure rolls the whole thing back and leaves the cart untouched.
pub async fn create_order(
    state: &AppState,
    user: &CurrentUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let cart_rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if cart_rows.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let product_ids: Vec<Uuid> = cart_rows.iter().filter_map(|r| r.product_id).collect();
    let service_ids: Vec<Uuid> = cart_rows.iter().filter_map(|r| r.service_id).collect();

    let product_prices: HashMap<Uuid, i64> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| (p.id, p.price))
            .collect()
    };

    let service_prices: HashMap<Uuid, i64> = if service_ids.is_empty() {
        HashMap::new()
    } else {
        Services::find()
            .filter(SvcCol::Id.is_in(service_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| (s.id, s.price))
            .collect()
    };

    // Hydrate each cart row with its live price; the snapshot taken here is
    // what the order items will carry forever.
    let mut lines: Vec<(Option<Uuid>, Option<Uuid>, i32, i64)> = Vec::new();
    let mut subtotal: i64 = 0;
    for row in &cart_rows {
        let unit_price = match (row.product_id, row.service_id) {
            (Some(pid), None) => product_prices.get(&pid).copied(),
            (None, Some(sid)) => service_prices.get(&sid).copied(),
            _ => None,
        };
        let unit_price = unit_price.ok_or_else(|| {
            AppError::Validation("cart item references a missing catalog item".to_string())
        })?;
        subtotal += unit_price * i64::from(row.quantity);
        lines.push((row.product_id, row.service_id, row.quantity, unit_price));
    }

    let shipping_cost = shipping_cost_for(subtotal, state.config.shipping_fee);

    let (promo_code, discount) = match payload.promo_code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => {
            let promo = promo_service::find_valid(state, code, subtotal)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict("promo code is invalid or expired".to_string())
                })?;
            let discount = promo_service::discount_for(&promo, subtotal);
            (Some(promo.code), discount)
        }
        None => (None, 0),
    };

    let total = subtotal + shipping_cost - discount;

    let order_id = Uuid::new_v4();
    let order_number = build_order_number(order_id);
    let shipping_address = serde_json::to_value(&payload.shipping_address)
        .map_err(|e| AppError::Internal(e.into()))?;

    let order = OrderActive {
        id: Set(order_id),
        order_number: Set(order_number),
        user_id: Set(user.user_id),
        status: Set("pending".into()),
        subtotal: Set(subtotal),
        shipping_cost: Set(shipping_cost),
        total: Set(total),
        payment_method: Set(payload.payment_method.as_str().into()),
        shipping_address: Set(shipping_address),
        promo_code: Set(promo_code),
        discount: Set(discount),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    for (product_id, service_id, quantity, unit_price) in &lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(*product_id),
            service_id: Set(*service_id),
            quantity: Set(*quantity),
            unit_price: Set(*unit_price),
            total_price: Set(*unit_price * i64::from(*quantity)),
        }
        .insert(&txn)
        .await?;

        order_items.push(order_item_from_entity(item));
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
            "total": order.total,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: order_from_entity(order)?,
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &CurrentUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
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
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

pub(crate) fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let shipping_address = serde_json::from_value(model.shipping_address)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        user_id: model.user_id,
        status: model.status,
        subtotal: model.subtotal,
        shipping_cost: model.shipping_cost,
        total: model.total,
        payment_method: model.payment_method,
        shipping_address,
        promo_code: model.promo_code,
        discount: model.discount,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        service_id: model.service_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
    }
}
