//! Explicit transaction boundary for domain-store operations.
//!
//! Every adapter mutation runs through [`UnitOfWork::transaction`]: the
//! handle is scoped to one call, staged writes commit exactly once when the
//! closure returns `Ok`, and the transaction rolls back on any error path.
//! There is no independently callable commit, so no caller can publish a
//! partially constructed aggregate. Error mapping from pool and Diesel
//! failures to the shared [`PersistenceError`] also lives here.

use diesel::result::Error as DieselError;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::{DbPool, PoolError};

/// Per-call transaction handle over the shared connection pool.
#[derive(Clone)]
pub struct UnitOfWork {
    pool: DbPool,
}

impl UnitOfWork {
    /// Create a unit of work over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `op` inside a single transaction.
    ///
    /// The staged writes become visible together when the closure returns
    /// `Ok`; any error rolls all of them back.
    pub async fn transaction<'a, R, F>(&self, op: F) -> Result<R, PersistenceError>
    where
        R: Send + 'a,
        F: for<'r> FnOnce(
                &'r mut AsyncPgConnection,
            ) -> ScopedBoxFuture<'a, 'r, Result<R, DieselError>>
            + Send
            + 'a,
    {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        conn.transaction(op).await.map_err(map_diesel_error)
    }

    /// Check out a connection for a single-statement read.
    pub async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, PersistenceError> {
        self.pool.get().await.map_err(map_pool_error)
    }
}

/// Map pool errors to the shared persistence error.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to the shared persistence error.
pub(crate) fn map_diesel_error(error: DieselError) -> PersistenceError {
    use diesel::result::DatabaseErrorKind;

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection error")
        }
        DieselError::NotFound => PersistenceError::query("record not found"),
        DieselError::DatabaseError(_, _) => PersistenceError::query("database error"),
        _ => PersistenceError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(mapped, PersistenceError::Connection { .. }));
        assert!(mapped.to_string().contains("timed out"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let mapped = map_diesel_error(DieselError::NotFound);
        assert!(matches!(mapped, PersistenceError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }
}
