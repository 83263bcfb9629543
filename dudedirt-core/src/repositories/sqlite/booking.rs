// src/repositories/sqlite/booking.rs

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use dudedirt_common::models::{Booking, BookingStatus, PointReason, PointTransaction};
use dudedirt_common::traits::repository_traits::BookingRepository;

use super::point_transaction::insert_transaction;
use crate::Error;

pub struct SqliteBookingRepository {
    pool: Pool<Sqlite>,
}

impl SqliteBookingRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

async fn slot_taken_in<'e, E>(
    executor: E,
    service_id: i64,
    scheduled_at: DateTime<Utc>,
) -> Result<bool, Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"SELECT COUNT(*) AS n FROM bookings
           WHERE service_id = ? AND scheduled_at = ? AND status != 'cancelled'"#,
    )
    .bind(service_id)
    .bind(scheduled_at)
    .fetch_one(executor)
    .await?;
    let n: i64 = row.try_get("n")?;
    Ok(n > 0)
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create_with_award(
        &self,
        booking: &Booking,
        award: i64,
    ) -> Result<PointTransaction, Error> {
        let mut tx = self.pool.begin().await?;

        // Slot re-check and both inserts share one transaction; losing the
        // race rolls everything back and surfaces SlotConflict.
        if slot_taken_in(&mut *tx, booking.service_id, booking.scheduled_at).await? {
            return Err(Error::SlotConflict);
        }

        sqlx::query(
            r#"INSERT INTO bookings
               (booking_id, user_id, service_id, scheduled_at, status, special_instructions, total_price_cents, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(booking.booking_id)
        .bind(booking.user_id)
        .bind(booking.service_id)
        .bind(booking.scheduled_at)
        .bind(booking.status.to_string())
        .bind(&booking.special_instructions)
        .bind(booking.total_price_cents)
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await?;

        let entry = PointTransaction::new(
            booking.user_id,
            award,
            PointReason::BookingConfirmed,
            Some(booking.booking_id),
        );
        insert_transaction(&mut *tx, &entry).await?;

        tx.commit().await?;
        Ok(entry)
    }

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, Error> {
        let row = sqlx::query(
            r#"SELECT booking_id, user_id, service_id, scheduled_at, status, special_instructions, total_price_cents, created_at
               FROM bookings WHERE booking_id = ?"#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_booking).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, Error> {
        let rows = sqlx::query(
            r#"SELECT booking_id, user_id, service_id, scheduled_at, status, special_instructions, total_price_cents, created_at
               FROM bookings WHERE user_id = ?
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_booking).collect()
    }

    async fn list_completed_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, Error> {
        let rows = sqlx::query(
            r#"SELECT booking_id, user_id, service_id, scheduled_at, status, special_instructions, total_price_cents, created_at
               FROM bookings WHERE user_id = ? AND status = 'completed'
               ORDER BY scheduled_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_booking).collect()
    }

    async fn update_status(&self, booking_id: Uuid, status: BookingStatus) -> Result<(), Error> {
        let result = sqlx::query(r#"UPDATE bookings SET status = ? WHERE booking_id = ?"#)
            .bind(status.to_string())
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("booking {}", booking_id)));
        }
        Ok(())
    }

    async fn slot_taken(
        &self,
        service_id: i64,
        scheduled_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        slot_taken_in(&self.pool, service_id, scheduled_at).await
    }
}

fn row_to_booking(row: sqlx::sqlite::SqliteRow) -> Result<Booking, Error> {
    let status: String = row.try_get("status")?;
    Ok(Booking {
        booking_id: row.try_get("booking_id")?,
        user_id: row.try_get("user_id")?,
        service_id: row.try_get("service_id")?,
        scheduled_at: row.try_get::<DateTime<Utc>, _>("scheduled_at")?,
        status: BookingStatus::from_str(&status).map_err(Error::Parse)?,
        special_instructions: row.try_get("special_instructions")?,
        total_price_cents: row.try_get("total_price_cents")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
