// src/repositories/sqlite/user.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use dudedirt_common::models::User;
use dudedirt_common::traits::repository_traits::UserRepository;

use crate::Error;

pub struct SqliteUserRepository {
    pool: Pool<Sqlite>,
}

impl SqliteUserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, Error> {
        let sql = format!(
            r#"SELECT user_id, username, email, password_hash, full_name, phone, address, created_at
               FROM users WHERE {} = ?"#,
            column
        );
        let row = sqlx::query(&sql).bind(value).fetch_optional(&self.pool).await?;
        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"INSERT INTO users (user_id, username, email, password_hash, full_name, phone, address, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        let row = sqlx::query(
            r#"SELECT user_id, username, email, password_hash, full_name, phone, address, created_at
               FROM users WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        self.fetch_one_by("username", username).await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<(), Error> {
        let result = sqlx::query(
            r#"UPDATE users SET full_name = ?, phone = ?, address = ? WHERE user_id = ?"#,
        )
        .bind(full_name)
        .bind(phone)
        .bind(address)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }
}

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> Result<User, Error> {
    Ok(User {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
