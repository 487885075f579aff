use sea_orm::{ConnAcquireErr, DbErr, SqlErr};
use thiserror::Error;

/// Failures from the durable state store.
///
/// Database errors are classified on the way out of the data layer so the
/// sync coordinator can tell backpressure and integrity faults apart from
/// plain driver errors without inspecting `DbErr` itself.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A storage-layer invariant rejected the write (duplicate platform id,
    /// duplicate command name for a server, or a second active name binding).
    #[error("Storage constraint violated: {0}")]
    ConstraintViolation(String),

    /// The connection pool did not yield a connection within the configured
    /// acquire timeout. Backpressure signal to callers; transient.
    #[error("Timed out waiting for a database connection")]
    PoolTimeout,

    /// Any other database error.
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => StoreError::PoolTimeout,
            err => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => {
                    StoreError::ConstraintViolation(msg)
                }
                _ => StoreError::Db(err),
            },
        }
    }
}
