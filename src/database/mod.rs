use error_stack::{Report, ResultExt};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;

use crate::config;

pub mod error;
pub use error::{Error, ErrorExt, ErrorExt2, Result};

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

/// Creates the `authors` and `posts` tables, including the unique
/// constraint on author names.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// A Postgres database connection pool.
#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    /// Creates and tests a database pool from the database configuration.
    #[tracing::instrument(skip_all, name = "db.pool.new")]
    pub async fn new(cfg: &config::Database) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(cfg.timeout())
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let connect_opts = connect_options(cfg)?;
        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {}
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

/// Parses the connection url. With `enforce_tls` set, connections
/// without TLS are refused, otherwise the url's `sslmode` applies.
fn connect_options(cfg: &config::Database) -> Result<PgConnectOptions> {
    let connect_opts = PgConnectOptions::from_str(&cfg.url).change_context(Error::InvalidUrl)?;
    if cfg.enforce_tls {
        Ok(connect_opts.ssl_mode(PgSslMode::Require))
    } else {
        Ok(connect_opts)
    }
}

impl From<sqlx::PgPool> for Pool {
    fn from(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    /// Applies all pending migrations from [`MIGRATOR`].
    #[tracing::instrument(name = "db.migrate", skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| Report::new(Error::Internal(e.into())))
            .attach_printable("could not apply migrations")
    }

    /// It attempts to get an active database connection.
    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        match self.pool.acquire().await {
            Ok(inner) => Ok(inner),
            Err(e @ sqlx::Error::PoolTimedOut) => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }

    /// Waits until a connection is established or the configured
    /// acquire timeout has passed.
    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e @ sqlx::Error::PoolTimedOut) => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }
}
