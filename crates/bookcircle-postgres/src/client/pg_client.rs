//! High-level database client that manages connections and migrations.

use std::sync::Arc;

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_migrations::MigrationHarness;

use crate::{
    MIGRATIONS, PgConfig, PgError, PgResult, TRACING_TARGET_CONNECTION, TRACING_TARGET_MIGRATION,
};

/// Async connection pool backing [`PgClient`].
pub type ConnectionPool = Pool<AsyncPgConnection>;

/// A connection checked out of the pool.
///
/// Dereferences to [`AsyncPgConnection`], so all repository traits are
/// available directly on it.
pub type PooledConnection = Object<AsyncPgConnection>;

/// High-level database client that manages connections and migrations.
///
/// This struct provides the main interface for database operations,
/// encapsulating connection pool management and configuration. It is cheap to
/// clone and safe to share across request handlers.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

/// Inner data for [`PgClient`].
struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This establishes a lazy connection pool: connections are opened on
    /// first use, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.postgres_endpoint);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(Some(config.connection_timeout()))
            .create_timeout(Some(config.connection_timeout()))
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %e,
                    "Failed to create connection pool"
                );
                PgError::Unexpected(format!("Failed to build connection pool: {e}").into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// This method will wait up to the configured timeout for an available
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available within the timeout period.
    pub async fn get_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })
    }

    /// Applies all pending embedded migrations.
    ///
    /// Runs on a blocking thread because the Diesel migration harness is
    /// synchronous.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be established or a migration
    /// fails to apply.
    pub async fn run_pending_migrations(&self) -> PgResult<()> {
        let database_url = self.inner.config.postgres_endpoint.clone();

        tokio::task::spawn_blocking(move || -> PgResult<()> {
            let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
                .map_err(PgError::Connection)?;

            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(PgError::Migration)?;

            tracing::info!(
                target: TRACING_TARGET_MIGRATION,
                applied = applied.len(),
                "database migrations are up to date"
            );

            Ok(())
        })
        .await
        .map_err(|e| PgError::Unexpected(format!("migration task failed: {e}").into()))?
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for PgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.inner.pool.status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field(
                "pool_max_connections",
                &self.inner.config.postgres_max_connections,
            )
            .field("pool_current_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}
