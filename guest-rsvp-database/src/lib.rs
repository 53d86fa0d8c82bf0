pub mod error;
pub mod memory;
pub mod models;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use error::DatabaseError;
use guest_rsvp_model::{GuestResponse, GuestSubmission};
use schema::guests;
use tracing::{debug, info};

pub use crate::memory::MemoryGuestStore;
use crate::models::{GuestRow, NewGuestRow};

/// The only shared mutable resource of the service.
///
/// Implementations insert atomically: a failed `insert` leaves nothing behind.
#[async_trait]
pub trait GuestStore: Send + Sync {
    /// Persists a validated submission and returns it with id and timestamps.
    async fn insert(&self, submission: GuestSubmission) -> Result<GuestResponse, DatabaseError>;

    /// All responses, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<GuestResponse>, DatabaseError>;
}

pub type SharedGuestStore = Arc<dyn GuestStore>;

// https://github.com/tokio-rs/axum/tree/main/examples/diesel-async-postgres

pub fn get_database_connection(
    database_url: &str,
) -> Result<Pool<AsyncPgConnection>, DatabaseError> {
    let config = AsyncDieselConnectionManager::<diesel_async::AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(config).build()?)
}

/// Picks the store implementation from the scheme of `database_url`.
pub async fn connect(database_url: &str) -> Result<SharedGuestStore, DatabaseError> {
    if database_url.starts_with("memory://") {
        info!("using in-memory guest store");
        return Ok(Arc::new(MemoryGuestStore::default()));
    }
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        let store = PgGuestStore::new(get_database_connection(database_url)?);
        store.migrate().await?;
        info!("using postgres guest store");
        return Ok(Arc::new(store));
    }
    Err(DatabaseError::UnsupportedUrl(database_url.to_owned()))
}

#[derive(Clone)]
pub struct PgGuestStore {
    pool: Pool<AsyncPgConnection>,
}

const CREATE_GUESTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS guests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    seq BIGSERIAL NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    allergies_and_diet TEXT NOT NULL DEFAULT '',
    needs_accommodation BOOLEAN NOT NULL DEFAULT FALSE,
    available_days INTEGER[] NOT NULL DEFAULT '{}'
        CHECK (1 <= ALL(available_days) AND 31 >= ALL(available_days)),
    available_time TEXT[] NOT NULL DEFAULT '{}'
        CHECK (available_time <@ ARRAY['Après-midi', 'Soir']::TEXT[]),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_GUESTS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS guests_newest_first ON guests (created_at DESC, seq DESC)";

impl PgGuestStore {
    #[must_use]
    pub const fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }

    /// Creates the table and its ordering index when they are missing.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        diesel::sql_query(CREATE_GUESTS_TABLE)
            .execute(&mut connection)
            .await?;
        diesel::sql_query(CREATE_GUESTS_INDEX)
            .execute(&mut connection)
            .await?;
        debug!("guests table is ready");
        Ok(())
    }
}

#[async_trait]
impl GuestStore for PgGuestStore {
    async fn insert(&self, submission: GuestSubmission) -> Result<GuestResponse, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let row = diesel::insert_into(guests::table)
            .values(NewGuestRow::from(submission))
            .returning(GuestRow::as_returning())
            .get_result(&mut connection)
            .await?;
        GuestResponse::try_from(row)
    }

    async fn list_newest_first(&self) -> Result<Vec<GuestResponse>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let rows = guests::table
            .order((guests::created_at.desc(), guests::seq.desc()))
            .select(GuestRow::as_select())
            .load(&mut connection)
            .await?;
        rows.into_iter().map(GuestResponse::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_scheme_needs_no_server() {
        let store = connect("memory://").await.unwrap();
        assert!(store.list_newest_first().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_scheme_is_rejected() {
        let error = connect("mongodb://localhost/rsvp").await.err().unwrap();
        assert!(matches!(error, DatabaseError::UnsupportedUrl(_)));
    }

    #[test]
    fn pool_builds_without_connecting() {
        assert!(get_database_connection("postgres://postgres@localhost/rsvp").is_ok());
    }
}
