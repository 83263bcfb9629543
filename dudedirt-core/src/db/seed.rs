// dudedirt-core/src/db/seed.rs
//
// Idempotent startup seeding of the catalog reference data. Each table is
// populated only when empty, so re-running at every boot is safe.

use sqlx::{Pool, Row, Sqlite};
use tracing::info;

use crate::Error;

pub async fn seed_reference_data(pool: &Pool<Sqlite>) -> Result<(), Error> {
    seed_services(pool).await?;
    seed_products(pool).await?;
    seed_redemption_options(pool).await?;
    Ok(())
}

async fn table_is_empty(pool: &Pool<Sqlite>, table: &str) -> Result<bool, Error> {
    // Table names come from the constants below, never from user input.
    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
        .fetch_one(pool)
        .await?;
    let n: i64 = row.try_get("n")?;
    Ok(n == 0)
}

async fn seed_services(pool: &Pool<Sqlite>) -> Result<(), Error> {
    if !table_is_empty(pool, "services").await? {
        return Ok(());
    }

    let services: [(i64, &str, &str, i64, i64); 6] = [
        (1, "Lawn Mowing", "Professional lawn mowing service", 5000, 1),
        (2, "Fertilization", "Organic fertilization treatment", 7500, 1),
        (3, "Weed Control", "Professional weed control treatment", 6500, 1),
        (4, "Aeration", "Lawn aeration service", 10000, 2),
        (5, "Overseeding", "Grass overseeding service", 8500, 2),
        (6, "Leaf Removal", "Fall leaf cleanup service", 6000, 2),
    ];

    for (id, name, description, price_cents, duration_hours) in services {
        sqlx::query(
            r#"INSERT INTO services (service_id, name, description, price_cents, duration_hours, active)
               VALUES (?, ?, ?, ?, ?, 1)"#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(duration_hours)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} services", services.len());
    Ok(())
}

async fn seed_products(pool: &Pool<Sqlite>) -> Result<(), Error> {
    if !table_is_empty(pool, "products").await? {
        return Ok(());
    }

    let products: [(i64, &str, &str, i64, &str, &str); 6] = [
        (
            1,
            "Organic Fertilizer",
            "Premium organic fertilizer for healthy lawn growth",
            2999,
            "50lb bag",
            "Fertilizer",
        ),
        (
            2,
            "Weed Control Plus",
            "Professional weed killer and prevention formula",
            4599,
            "1 gallon",
            "Weed Control",
        ),
        (
            3,
            "Grass Seed Mix",
            "Premium grass seed blend for thick, green lawns",
            1999,
            "10lb bag",
            "Seeds",
        ),
        (
            4,
            "Lawn Aerator Tool",
            "Professional-grade manual lawn aerator",
            8999,
            "Standard size",
            "Tools",
        ),
        (
            5,
            "Mulch Premium",
            "Natural wood mulch for garden beds and landscaping",
            1299,
            "2 cubic ft",
            "Mulch",
        ),
        (
            6,
            "Irrigation Timer",
            "Smart irrigation timer with weather sensing",
            14999,
            "6-zone",
            "Irrigation",
        ),
    ];

    for (id, name, description, price_cents, size, category) in products {
        sqlx::query(
            r#"INSERT INTO products (product_id, name, description, price_cents, size, category)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(size)
        .bind(category)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} products", products.len());
    Ok(())
}

async fn seed_redemption_options(pool: &Pool<Sqlite>) -> Result<(), Error> {
    if !table_is_empty(pool, "redemption_options").await? {
        return Ok(());
    }

    let options: [(i64, &str, i64, &str); 4] = [
        (1, "$10 off your next service", 100, "discount"),
        (2, "Free Grass Seed Mix", 250, "free_product"),
        (3, "Free Lawn Mowing visit", 500, "free_service"),
        (4, "VIP priority scheduling", 1000, "status_upgrade"),
    ];

    for (id, name, cost, effect) in options {
        sqlx::query(
            r#"INSERT INTO redemption_options (option_id, name, cost, effect)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(name)
        .bind(cost)
        .bind(effect)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} redemption options", options.len());
    Ok(())
}
