//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async`'s bb8 integration so the persistence adapters can
//! check out connections without touching pool plumbing. Checkout respects
//! the configured timeout and every failure is mapped to a `PoolError`
//! before it reaches a port boundary.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Settings for the domain-store connection pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    database_url: String,
    max_connections: u32,
    checkout_timeout: Duration,
}

impl PoolSettings {
    /// Create settings with defaults: 10 connections, 30 second checkout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            checkout_timeout: Duration::from_secs(30),
        }
    }

    /// Cap the number of pooled connections.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Bound how long a checkout may wait for a free connection.
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Database URL the pool connects to.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Shared async connection pool for the PostgreSQL domain store.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed.
    pub async fn connect(settings: PoolSettings) -> Result<Self, PoolError> {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(settings.database_url());

        let inner = Pool::builder()
            .max_size(settings.max_connections)
            .connection_timeout(settings.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection becomes available
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn settings_defaults_are_sensible() {
        let settings = PoolSettings::new("postgres://localhost/registry");
        assert_eq!(settings.database_url(), "postgres://localhost/registry");
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.checkout_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn settings_builder_overrides_defaults() {
        let settings = PoolSettings::new("postgres://localhost/registry")
            .with_max_connections(4)
            .with_checkout_timeout(Duration::from_secs(5));
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.checkout_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn errors_carry_their_messages() {
        assert!(
            PoolError::checkout("connection refused")
                .to_string()
                .contains("connection refused")
        );
        assert!(PoolError::build("bad url").to_string().contains("bad url"));
    }
}
