use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use techstore_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::{AddToCartRequest, UpdateCartItemRequest},
        orders::{CreateOrderRequest, PaymentMethod},
        sav::{CreateSavTicketRequest, SavTicketType, UpdateSavTicketRequest},
    },
    entity::{products::ActiveModel as ProductActive, users::ActiveModel as UserActive},
    error::AppError,
    middleware::identity::CurrentUser,
    models::ShippingAddress,
    routes::admin::UpdateOrderStatusRequest,
    routes::params::{OrderListQuery, Pagination},
    services::{admin_service, cart_service, order_service, promo_service, sav_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: customer fills a cart (merge on repeat add), checks out
// with a promo code, an admin walks the order forward, and the customer opens
// an after-sales ticket on one of the order lines.
#[tokio::test]
async fn cart_checkout_and_sav_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let customer_id = create_user(&state, "awa@example.com").await?;
    let other_id = create_user(&state, "moussa@example.com").await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Clavier mécanique".into()),
        description: Set(Some("Switches rouges, AZERTY".into())),
        price: Set(10_000),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    let customer = CurrentUser {
        user_id: customer_id,
        role: "customer".into(),
    };
    let other = CurrentUser {
        user_id: other_id,
        role: "customer".into(),
    };
    let admin = CurrentUser {
        user_id: other_id,
        role: "admin".into(),
    };

    // Adding the same product twice merges into one row.
    for _ in 0..2 {
        cart_service::add_to_cart(
            &state,
            &customer,
            AddToCartRequest {
                product_id: Some(product.id),
                service_id: None,
                quantity: 1,
            },
        )
        .await?;
    }
    let cart = cart_service::list_cart(&state, &customer).await?;
    let cart_items = cart.data.unwrap().items;
    assert_eq!(cart_items.len(), 1);
    assert_eq!(cart_items[0].quantity, 2);

    // Malformed cart additions are refused before touching the ledger.
    let err = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: Some(product.id),
            service_id: None,
            quantity: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: Some(product.id),
            service_id: Some(Uuid::new_v4()),
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: None,
            service_id: None,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A quantity below 1 is refused and the row keeps its old value.
    let err = cart_service::update_quantity(
        &state,
        &customer,
        cart_items[0].id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let cart = cart_service::list_cart(&state, &customer).await?;
    assert_eq!(cart.data.unwrap().items[0].quantity, 2);

    // An expired code fails validation even when every other condition holds.
    sqlx::query(
        r#"
        INSERT INTO promo_codes (id, code, discount_percent, valid_from, valid_until)
        VALUES ($1, 'FINI10', 10, $2, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Utc::now() - Duration::days(30))
    .bind(Utc::now() - Duration::days(1))
    .execute(&state.pool)
    .await?;
    let err = promo_service::validate_promo(&state, "FINI10", 20_000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Checkout carrying that code is rejected and creates nothing.
    let err = order_service::create_order(
        &state,
        &customer,
        CreateOrderRequest {
            shipping_address: shipping_address(),
            payment_method: PaymentMethod::Cash,
            promo_code: Some("FINI10".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let order_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(order_count.0, 0);
    let cart = cart_service::list_cart(&state, &customer).await?;
    assert_eq!(cart.data.unwrap().items.len(), 1);

    // A 10% promo valid for this subtotal.
    sqlx::query(
        r#"
        INSERT INTO promo_codes (id, code, discount_percent, min_order_amount, valid_from, valid_until)
        VALUES ($1, 'PROMO10', 10, 10000, $2, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Utc::now() - Duration::days(1))
    .bind(Utc::now() + Duration::days(1))
    .execute(&state.pool)
    .await?;

    let checkout = order_service::create_order(
        &state,
        &customer,
        CreateOrderRequest {
            shipping_address: shipping_address(),
            payment_method: PaymentMethod::Cash,
            promo_code: Some("PROMO10".into()),
        },
    )
    .await?;
    let order_with_items = checkout.data.unwrap();
    let order = order_with_items.order;
    assert_eq!(order.subtotal, 20_000);
    assert_eq!(order.shipping_cost, 5_000);
    assert_eq!(order.discount, 2_000);
    assert_eq!(order.total, 23_000);
    assert_eq!(order.status, "pending");
    assert!(order.order_number.starts_with("CMD-"));
    assert_eq!(order_with_items.items.len(), 1);

    // Checkout wiped the cart.
    let cart = cart_service::list_cart(&state, &customer).await?;
    assert!(cart.data.unwrap().items.is_empty());

    // Checkout on an empty cart is rejected.
    let err = order_service::create_order(
        &state,
        &customer,
        CreateOrderRequest {
            shipping_address: shipping_address(),
            payment_method: PaymentMethod::Cash,
            promo_code: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));

    // Orders are scoped to their owner.
    let err = order_service::get_order(&state, &other, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Admin moves the order forward; going backwards is refused.
    let updated = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "confirmed".into(),
        },
    )
    .await?;
    assert_eq!(updated.data.unwrap().status, "confirmed");

    let err = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "pending".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // A non-admin caller is refused outright.
    let err = admin_service::list_all_orders(
        &state,
        &customer,
        OrderListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            status: None,
            sort_order: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Customer opens a ticket on one of their order lines.
    let item_id = order_with_items.items[0].id;
    let ticket = sav_service::create_ticket(
        &state,
        &customer,
        CreateSavTicketRequest {
            order_id: order.id,
            order_item_id: item_id,
            ticket_type: SavTicketType::DefectiveProduct,
            description: "Le clavier ne s'allume plus après deux jours.".into(),
        },
    )
    .await?;
    let ticket = ticket.data.unwrap();
    assert!(ticket.ticket_number.starts_with("SAV-"));
    assert_eq!(ticket.status, "pending");

    // Someone else cannot open a ticket on that order.
    let err = sav_service::create_ticket(
        &state,
        &other,
        CreateSavTicketRequest {
            order_id: order.id,
            order_item_id: item_id,
            ticket_type: SavTicketType::Other,
            description: "Cette commande ne m'appartient pas.".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Admin resolves the ticket.
    let resolved = admin_service::update_ticket(
        &state,
        &admin,
        ticket.id,
        UpdateSavTicketRequest {
            status: Some("resolved".into()),
            resolution: Some("Clavier remplacé sous garantie.".into()),
        },
    )
    .await?;
    assert_eq!(resolved.data.unwrap().status, "resolved");

    // Dashboard reflects the order and the ticket.
    let stats = admin_service::dashboard_stats(&state, &admin).await?;
    let stats = stats.data.unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, 23_000);
    assert_eq!(stats.tickets_by_status.get("resolved"), Some(&1));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE sav_tickets, order_items, orders, cart_items, suggestions, promo_codes, audit_logs, products, services, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        shipping_fee: 5_000,
    };

    Ok(AppState { pool, orm, config })
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Awa".into(),
        last_name: "Diop".into(),
        address: "12 rue des Manguiers".into(),
        city: "Dakar".into(),
        postal_code: "10000".into(),
        country: "Sénégal".into(),
    }
}
