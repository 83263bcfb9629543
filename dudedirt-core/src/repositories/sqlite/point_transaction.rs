// src/repositories/sqlite/point_transaction.rs
//
// The seeds ledger. Inserts only — the balance is always SUM(amount) over
// the log, and the two conditional writes (debit, completion award) keep
// their precondition check and insert inside one storage transaction.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use dudedirt_common::models::{PointReason, PointTransaction};
use dudedirt_common::traits::repository_traits::PointTransactionRepository;

use crate::Error;

pub struct SqlitePointTransactionRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePointTransactionRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

/// Shared insert used here and by the booking repository's finalize
/// transaction.
pub(crate) async fn insert_transaction<'e, E>(
    executor: E,
    entry: &PointTransaction,
) -> Result<(), Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"INSERT INTO point_transactions (transaction_id, user_id, amount, reason, booking_id, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(entry.transaction_id)
    .bind(entry.user_id)
    .bind(entry.amount)
    .bind(entry.reason.to_string())
    .bind(entry.booking_id)
    .bind(entry.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn balance_of<'e, E>(executor: E, user_id: Uuid) -> Result<i64, Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"SELECT COALESCE(SUM(amount), 0) AS balance
           FROM point_transactions WHERE user_id = ?"#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;
    Ok(row.try_get("balance")?)
}

#[async_trait]
impl PointTransactionRepository for SqlitePointTransactionRepository {
    async fn append(&self, entry: &PointTransaction) -> Result<(), Error> {
        insert_transaction(&self.pool, entry).await
    }

    async fn append_debit(&self, user_id: Uuid, cost: i64) -> Result<PointTransaction, Error> {
        let mut tx = self.pool.begin().await?;

        // The balance check must see the latest ledger state, so it lives
        // inside the same transaction as the append.
        let available = balance_of(&mut *tx, user_id).await?;
        if available < cost {
            return Err(Error::InsufficientPoints {
                needed: cost,
                available,
            });
        }

        let entry = PointTransaction::new(user_id, -cost, PointReason::Redemption, None);
        insert_transaction(&mut *tx, &entry).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn award_completion_once(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        amount: i64,
    ) -> Result<PointTransaction, Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"SELECT COUNT(*) AS n FROM point_transactions
               WHERE booking_id = ? AND reason = 'service_completed'"#,
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;
        let existing: i64 = row.try_get("n")?;
        if existing > 0 {
            return Err(Error::AlreadyAwarded);
        }

        let entry = PointTransaction::new(
            user_id,
            amount,
            PointReason::ServiceCompleted,
            Some(booking_id),
        );
        insert_transaction(&mut *tx, &entry).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn balance(&self, user_id: Uuid) -> Result<i64, Error> {
        balance_of(&self.pool, user_id).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PointTransaction>, Error> {
        let rows = sqlx::query(
            r#"SELECT transaction_id, user_id, amount, reason, booking_id, created_at
               FROM point_transactions WHERE user_id = ?
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_transaction).collect()
    }
}

fn row_to_transaction(row: sqlx::sqlite::SqliteRow) -> Result<PointTransaction, Error> {
    let reason: String = row.try_get("reason")?;
    Ok(PointTransaction {
        transaction_id: row.try_get("transaction_id")?,
        user_id: row.try_get("user_id")?,
        amount: row.try_get("amount")?,
        reason: PointReason::from_str(&reason).map_err(Error::Parse)?,
        booking_id: row.try_get("booking_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
