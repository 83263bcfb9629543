// src/repositories/sqlite/catalog.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use dudedirt_common::models::{Product, RedemptionOption, Service};
use dudedirt_common::traits::repository_traits::CatalogRepository;

use crate::Error;

pub struct SqliteCatalogRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCatalogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn list_services(&self) -> Result<Vec<Service>, Error> {
        let rows = sqlx::query(
            r#"SELECT service_id, name, description, price_cents, duration_hours, active
               FROM services WHERE active = 1 ORDER BY service_id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_service).collect()
    }

    async fn get_service(&self, service_id: i64) -> Result<Option<Service>, Error> {
        let row = sqlx::query(
            r#"SELECT service_id, name, description, price_cents, duration_hours, active
               FROM services WHERE service_id = ?"#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_service).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, Error> {
        let rows = sqlx::query(
            r#"SELECT product_id, name, description, price_cents, size, category
               FROM products ORDER BY product_id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_product).collect()
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, Error> {
        let row = sqlx::query(
            r#"SELECT product_id, name, description, price_cents, size, category
               FROM products WHERE product_id = ?"#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_product).transpose()
    }

    async fn list_redemption_options(&self) -> Result<Vec<RedemptionOption>, Error> {
        let rows = sqlx::query(
            r#"SELECT option_id, name, cost, effect
               FROM redemption_options ORDER BY cost"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_option).collect()
    }

    async fn get_redemption_option(
        &self,
        option_id: i64,
    ) -> Result<Option<RedemptionOption>, Error> {
        let row = sqlx::query(
            r#"SELECT option_id, name, cost, effect
               FROM redemption_options WHERE option_id = ?"#,
        )
        .bind(option_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_option).transpose()
    }
}

fn row_to_service(row: sqlx::sqlite::SqliteRow) -> Result<Service, Error> {
    Ok(Service {
        service_id: row.try_get("service_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price_cents: row.try_get("price_cents")?,
        duration_hours: row.try_get("duration_hours")?,
        active: row.try_get("active")?,
    })
}

fn row_to_product(row: sqlx::sqlite::SqliteRow) -> Result<Product, Error> {
    Ok(Product {
        product_id: row.try_get("product_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price_cents: row.try_get("price_cents")?,
        size: row.try_get("size")?,
        category: row.try_get("category")?,
    })
}

fn row_to_option(row: sqlx::sqlite::SqliteRow) -> Result<RedemptionOption, Error> {
    Ok(RedemptionOption {
        option_id: row.try_get("option_id")?,
        name: row.try_get("name")?,
        cost: row.try_get("cost")?,
        effect: row.try_get("effect")?,
    })
}
