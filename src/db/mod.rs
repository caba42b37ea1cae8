//! Database access layer
//!
//! Pool construction, one-shot schema bootstrap, and the person store.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{Error, Result};

pub mod people;
pub mod query;

pub use people::PersonStore;

/// Connect to PostgreSQL.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    Ok(pool)
}

/// Create the people table if it does not exist yet.
///
/// The natural key mirrors the duplicate-insert conflict the store reports:
/// two rows may not share name, surname and patronymic.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS people (
            id          BIGSERIAL PRIMARY KEY,
            name        TEXT NOT NULL,
            surname     TEXT NOT NULL,
            patronymic  TEXT,
            age         BIGINT,
            gender      TEXT,
            nationality TEXT,
            UNIQUE (name, surname, patronymic)
        )",
    )
    .execute(pool)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
