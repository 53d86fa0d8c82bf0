use diesel_async::pooled_connection::deadpool;
use thiserror::Error;
use uuid::Uuid;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Unsupported database url {0:?}, expected postgres:// or memory://")]
    UnsupportedUrl(String),
    #[error("Failed to create database pool {0}")]
    PoolBuild(#[from] deadpool::BuildError),
    #[error("Database pool failed {0}")]
    Pool(#[from] deadpool::PoolError),
    #[error("Database query failed {0}")]
    Database(#[from] diesel::result::Error),
    #[error("In-memory store lock was poisoned")]
    Poisoned,
    #[error("Stored guest {0} is corrupt: {1}")]
    CorruptRow(Uuid, String),
}

impl<T> From<std::sync::PoisonError<T>> for DatabaseError {
    fn from(_value: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
