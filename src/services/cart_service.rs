use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartItemDto, CartList, UpdateCartItemRequest},
    error::{AppError, AppResult},
    middleware::identity::CurrentUser,
    models::{CartItem, Product, Service},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// List the caller's cart rows, newest first, each hydrated with its catalog
/// record. Rows whose referenced item has disappeared are kept with a null
/// reference so the client can decide how to render them.
pub async fn list_cart(state: &AppState, user: &CurrentUser) -> AppResult<ApiResponse<CartList>> {
    let rows: Vec<CartItem> = sqlx::query_as(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let product_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.product_id).collect();
    let service_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.service_id).collect();

    let products: Vec<Product> = if product_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as("SELECT * FROM products WHERE id = ANY($1)")
            .bind(&product_ids)
            .fetch_all(&state.pool)
            .await?
    };

    let services: Vec<Service> = if service_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as("SELECT * FROM services WHERE id = ANY($1)")
            .bind(&service_ids)
            .fetch_all(&state.pool)
            .await?
    };

    let items: Vec<CartItemDto> = rows
        .into_iter()
        .map(|row| {
            let product = row
                .product_id
                .and_then(|id| products.iter().find(|p| p.id == id).cloned());
            let service = row
                .service_id
                .and_then(|id| services.iter().find(|s| s.id == id).cloned());
            CartItemDto {
                id: row.id,
                product_id: row.product_id,
                service_id: row.service_id,
                product,
                service,
                quantity: row.quantity,
                created_at: row.created_at,
            }
        })
        .collect();

    let meta = Meta::total_only(items.len() as i64);
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

/// Add an item to the cart with merge semantics: a second add of the same
/// product or service increments the existing row's quantity. The merge is a
/// single upsert against the partial unique indexes, so concurrent adds
/// cannot produce duplicate rows.
pub async fn add_to_cart(
    state: &AppState,
    user: &CurrentUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let cart_item = match (payload.product_id, payload.service_id) {
        (Some(product_id), None) => {
            let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&state.pool)
                .await?;
            if exists.is_none() {
                return Err(AppError::NotFound);
            }

            sqlx::query_as::<_, CartItem>(
                r#"
                INSERT INTO cart_items (id, user_id, product_id, quantity)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, product_id) WHERE product_id IS NOT NULL
                DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user.user_id)
            .bind(product_id)
            .bind(payload.quantity)
            .fetch_one(&state.pool)
            .await?
        }
        (None, Some(service_id)) => {
            let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM services WHERE id = $1")
                .bind(service_id)
                .fetch_optional(&state.pool)
                .await?;
            if exists.is_none() {
                return Err(AppError::NotFound);
            }

            sqlx::query_as::<_, CartItem>(
                r#"
                INSERT INTO cart_items (id, user_id, service_id, quantity)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, service_id) WHERE service_id IS NOT NULL
                DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user.user_id)
            .bind(service_id)
            .bind(payload.quantity)
            .fetch_one(&state.pool)
            .await?
        }
        _ => {
            return Err(AppError::Validation(
                "exactly one of product_id or service_id must be set".to_string(),
            ));
        }
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "service_id": payload.service_id,
            "quantity": payload.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item, None))
}

/// Overwrite a cart row's quantity. Quantities below 1 are rejected; callers
/// remove the row instead.
pub async fn update_quantity(
    state: &AppState,
    user: &CurrentUser,
    cart_item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let updated: Option<CartItem> = sqlx::query_as(
        r#"
        UPDATE cart_items
        SET quantity = $3
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(cart_item_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .fetch_optional(&state.pool)
    .await?;

    match updated {
        Some(item) => Ok(ApiResponse::success("OK", item, None)),
        None => Err(AppError::NotFound),
    }
}

/// Idempotent delete: removing a row that is already gone succeeds.
pub async fn remove_item(
    state: &AppState,
    user: &CurrentUser,
    cart_item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_item_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Item removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    user: &CurrentUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
