use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Reservation, ReservationRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Tabular store of reservations.
///
/// Reads are never cached: every call returns the store as it is now.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list_reservations(&self) -> Result<Vec<ReservationRow>, StoreError>;
    async fn append(&self, reservation: &Reservation) -> Result<(), StoreError>;
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryReservationStore {
    rows: RwLock<Vec<ReservationRow>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<ReservationRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn list_reservations(&self) -> Result<Vec<ReservationRow>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn append(&self, reservation: &Reservation) -> Result<(), StoreError> {
        self.rows.write().await.push(reservation.to_row());
        Ok(())
    }
}

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reservations (
    id BIGSERIAL PRIMARY KEY,
    renter_name TEXT,
    renter_phone TEXT,
    box TEXT,
    start_date TEXT,
    end_date TEXT
)
"#;

/// Reservations kept in a PostgreSQL table shaped like the booking sheet: loosely typed text
/// cells, dates as `DD.MM.YYYY`.
pub struct PostgresReservationStore {
    pool: PgPool,
}

impl PostgresReservationStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        info!("reservations table ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl ReservationStore for PostgresReservationStore {
    async fn list_reservations(&self) -> Result<Vec<ReservationRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT renter_name, renter_phone, box, start_date, end_date FROM reservations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ReservationRow, StoreError> {
                Ok(ReservationRow {
                    name: row.try_get("renter_name")?,
                    phone: row.try_get("renter_phone")?,
                    box_id: row.try_get("box")?,
                    start_date: row.try_get("start_date")?,
                    end_date: row.try_get("end_date")?,
                })
            })
            .collect()
    }

    async fn append(&self, reservation: &Reservation) -> Result<(), StoreError> {
        let row = reservation.to_row();
        sqlx::query(
            "INSERT INTO reservations (renter_name, renter_phone, box, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(row.name)
        .bind(row.phone)
        .bind(row.box_id)
        .bind(row.start_date)
        .bind(row.end_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
