use chrono::{Duration, Utc};
use techstore_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, "admin@techstore.test", "Admin", "TechStore").await?;
    let user_id = ensure_user(&pool, "client@techstore.test", "Awa", "Diop").await?;

    let laptops = ensure_product_category(&pool, "Ordinateurs portables", "laptops").await?;
    let phones = ensure_product_category(&pool, "Smartphones", "smartphones").await?;
    let repairs = ensure_service_category(&pool, "Réparations", "repairs").await?;

    seed_products(&pool, laptops, phones).await?;
    seed_services(&pool, repairs).await?;
    seed_promo_codes(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    println!("Pass these as x-user-id (with x-user-role: admin for the first).");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET first_name = EXCLUDED.first_name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email}");
    Ok(row.0)
}

async fn ensure_product_category(
    pool: &sqlx::PgPool,
    name: &str,
    slug: &str,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO product_categories (id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

async fn ensure_service_category(
    pool: &sqlx::PgPool,
    name: &str,
    slug: &str,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO service_categories (id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

async fn seed_products(
    pool: &sqlx::PgPool,
    laptops: Uuid,
    phones: Uuid,
) -> anyhow::Result<()> {
    // Prices in whole FCFA.
    let products: Vec<(&str, &str, i64, &str, Uuid)> = vec![
        (
            "ThinkPad X1 Carbon",
            "Ultrabook 14\" pour professionnels",
            850_000,
            "Lenovo",
            laptops,
        ),
        (
            "MacBook Air M2",
            "Léger, silencieux, autonomie d'une journée",
            1_200_000,
            "Apple",
            laptops,
        ),
        (
            "Galaxy S23",
            "Smartphone Android haut de gamme",
            650_000,
            "Samsung",
            phones,
        ),
        (
            "Redmi Note 13",
            "Le meilleur rapport qualité-prix",
            180_000,
            "Xiaomi",
            phones,
        ),
    ];

    for (name, desc, price, brand, category_id) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, brand, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(brand)
        .bind(category_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_services(pool: &sqlx::PgPool, repairs: Uuid) -> anyhow::Result<()> {
    let services: Vec<(&str, &str, i64)> = vec![
        ("Remplacement écran smartphone", "Pièce et main d'œuvre incluses", 45_000),
        ("Nettoyage complet PC", "Dépoussiérage et pâte thermique", 15_000),
        ("Installation système", "Windows ou Linux, pilotes inclus", 20_000),
    ];

    for (name, desc, price) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, name, description, price, category_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(repairs)
        .execute(pool)
        .await?;
    }

    println!("Seeded services");
    Ok(())
}

async fn seed_promo_codes(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let now = Utc::now();
    let until = now + Duration::days(90);

    sqlx::query(
        r#"
        INSERT INTO promo_codes (id, code, description, discount_percent, min_order_amount, valid_from, valid_until)
        VALUES ($1, 'BIENVENUE10', '10% de réduction sur la première commande', 10, 50000, $2, $3)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(until)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO promo_codes (id, code, description, discount_amount, min_order_amount, valid_from, valid_until)
        VALUES ($1, 'LIVRAISON5000', '5000 FCFA offerts dès 100000 FCFA', 5000, 100000, $2, $3)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(until)
    .execute(pool)
    .await?;

    println!("Seeded promo codes");
    Ok(())
}
