use anyhow::{Context, Result, bail};
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::{Any, AnyPool, Row, migrate::MigrateDatabase};
use tracing::info;

use crate::models::{EnrichedListing, StoredCar};

/// Upper bound on rows returned by a single read
pub const READ_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(database_url: &str) -> Result<Self> {
        if database_url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if database_url.starts_with("postgresql://") || database_url.starts_with("postgres://") {
            Ok(Self::Postgres)
        } else {
            bail!("Unsupported database URL scheme, expected sqlite: or postgresql://")
        }
    }
}

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        install_default_drivers();
        let backend = Backend::from_url(database_url)?;

        // Create database file if it doesn't exist
        if backend == Backend::Sqlite && !Any::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database file");
            Any::create_database(database_url).await?;
        }

        let pool = AnyPoolOptions::new()
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .context("Database connection failed")?;

        // Run migrations
        info!("Running database migrations");
        match backend {
            Backend::Sqlite => sqlx::migrate!("./migrations/sqlite").run(&pool).await?,
            Backend::Postgres => sqlx::migrate!("./migrations/postgres").run(&pool).await?,
        }

        info!("Connected to {:?} database", backend);
        Ok(Self { pool })
    }

    /// Insert a whole batch in one transaction.
    ///
    /// Either every listing is stored or none is: the transaction rolls back
    /// when dropped uncommitted.
    pub async fn insert_batch(&self, listings: &[EnrichedListing]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for listing in listings {
            sqlx::query(
                r"
                INSERT INTO cars (make, model, year, mileage, price, location, resale_value, profit_margin)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(listing.make.as_str())
            .bind(listing.model.as_str())
            .bind(listing.year)
            .bind(listing.mileage)
            .bind(listing.price)
            .bind(listing.location.as_str())
            .bind(listing.resale_value)
            .bind(listing.profit_margin)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Read back at most `limit` stored cars, capped at [`READ_LIMIT`], in no particular order
    pub async fn read_recent(&self, limit: i64) -> Result<Vec<StoredCar>> {
        let rows = sqlx::query(
            r"
            SELECT id, make, model, year, mileage, price, location, resale_value, profit_margin
            FROM cars
            LIMIT $1
            ",
        )
        .bind(limit.clamp(0, READ_LIMIT))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<StoredCar> {
                Ok(StoredCar {
                    id: row.try_get("id")?,
                    make: row.try_get("make")?,
                    model: row.try_get("model")?,
                    year: row.try_get("year")?,
                    mileage: row.try_get("mileage")?,
                    price: row.try_get("price")?,
                    location: row.try_get("location")?,
                    resale_value: row.try_get("resale_value")?,
                    profit_margin: row.try_get("profit_margin")?,
                })
            })
            .collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
