//! Repository layer: the single gateway to the library database
//!
//! `Repository` owns the database session. While disconnected every
//! operation fails with [`AppError::NotConnected`] before touching the
//! engine. Domain operations are spread over the submodules as
//! `impl Repository` blocks.

pub mod books;
pub mod borrowings;
pub mod categories;
pub mod members;
pub mod reservations;
pub mod routines;
pub mod staff;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

/// Embedded schema migrations, applied on every successful connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Escape `%`, `_` and `\` so a user-supplied term matches literally inside a
/// `LIKE ... ESCAPE '\'` pattern, then wrap it for a "contains" match.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Database gateway
pub struct Repository {
    session: Option<Pool<Sqlite>>,
    config: DatabaseConfig,
}

impl Repository {
    /// Create a disconnected gateway
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            session: None,
            config,
        }
    }

    /// Create a gateway connected to a fresh in-memory database.
    ///
    /// Not behind `#[cfg(test)]` so integration tests can use it too.
    pub async fn connect_in_memory() -> AppResult<Self> {
        let mut repository = Self::new(DatabaseConfig::default());
        repository.connect("sqlite::memory:").await?;
        Ok(repository)
    }

    /// Open a session described by `descriptor` and bring the schema up to
    /// date. An existing session is closed first.
    pub async fn connect(&mut self, descriptor: &str) -> AppResult<()> {
        self.disconnect().await;

        if !descriptor.trim_start().starts_with("sqlite:") {
            let err = AppError::Connection(
                "Unsupported connection descriptor, expected a sqlite: URL".to_string(),
            );
            tracing::error!("{}", err);
            return Err(err);
        }

        let in_memory = descriptor.contains(":memory:") || descriptor.contains("mode=memory");

        let options = SqliteConnectOptions::from_str(descriptor)
            .map_err(|e| AppError::Connection(format!("Invalid connection descriptor: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(self.config.busy_timeout_ms));

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(self.config.acquire_timeout_secs));
        pool_options = if in_memory {
            // An in-memory database lives exactly as long as its connection,
            // so keep a single one and never recycle it.
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(self.config.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            tracing::error!("Connection failed: {}", e);
            AppError::Connection(e.to_string())
        })?;

        if let Err(e) = MIGRATOR.run(&pool).await {
            tracing::error!("Schema migration failed: {}", e);
            pool.close().await;
            return Err(AppError::Connection(format!("Schema migration failed: {}", e)));
        }

        self.session = Some(pool);
        tracing::info!("Connected to database successfully");
        Ok(())
    }

    /// Close the session. Calling this while disconnected does nothing.
    pub async fn disconnect(&mut self) {
        if let Some(pool) = self.session.take() {
            pool.close().await;
            tracing::info!("Disconnected from database");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(|pool| !pool.is_closed())
    }

    /// Liveness probe: round-trip a trivial query and check the echo.
    pub async fn test_connection(&self) -> AppResult<()> {
        let pool = self.pool()?;
        let value: i64 = self
            .bounded("test connection", async {
                Ok::<_, AppError>(sqlx::query_scalar("SELECT 1 AS TestConnection")
                    .fetch_one(pool)
                    .await?)
            })
            .await
            .inspect_err(|e| tracing::error!("Connection test failed: {}", e))?;

        if value != 1 {
            return Err(AppError::Connection(format!(
                "Connection test returned {} instead of 1",
                value
            )));
        }
        tracing::info!("Connection test successful");
        Ok(())
    }

    /// The live pool, or `NotConnected`.
    pub(crate) fn pool(&self) -> AppResult<&Pool<Sqlite>> {
        match &self.session {
            Some(pool) if !pool.is_closed() => Ok(pool),
            _ => Err(AppError::NotConnected),
        }
    }

    /// Run `fut` under the configured query timeout. A transaction owned by
    /// `fut` is dropped on timeout, which rolls it back.
    pub(crate) async fn bounded<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let limit = Duration::from_secs(self.config.query_timeout_secs);
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{} did not complete within {:?}",
                operation, limit
            ))),
        }
    }
}
