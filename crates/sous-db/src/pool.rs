//! Database connection pool configuration.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use sous_core::{Error, Result};

/// Pool sizing options. The defaults suit a single API instance;
/// deployments override them through the `SOUS_DB_*` variables.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to keep open.
    pub min_connections: u32,
    /// How long to wait for a free connection before failing the query.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: sous_core::defaults::MAX_CONNECTIONS,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl PoolConfig {
    /// Build a configuration from `SOUS_DB_MAX_CONNECTIONS` and
    /// `SOUS_DB_ACQUIRE_TIMEOUT_SECS`. Unset or unparsable values keep
    /// the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_u32("SOUS_DB_MAX_CONNECTIONS") {
            config.max_connections = n;
        }
        if let Some(secs) = env_u32("SOUS_DB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout = Duration::from_secs(u64::from(secs));
        }
        config
    }

    /// Open a PostgreSQL connection pool with this configuration.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool> {
        let start = Instant::now();

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "pool",
            op = "connect",
            max_connections = self.max_connections,
            pool_size = pool.size(),
            pool_idle = pool.num_idle(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Database connection pool established"
        );
        Ok(pool)
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_sizing() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_overrides_max_connections() {
        std::env::set_var("SOUS_DB_MAX_CONNECTIONS", "25");
        let config = PoolConfig::from_env();
        std::env::remove_var("SOUS_DB_MAX_CONNECTIONS");

        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_from_env_ignores_garbage() {
        std::env::set_var("SOUS_DB_ACQUIRE_TIMEOUT_SECS", "soon");
        let config = PoolConfig::from_env();
        std::env::remove_var("SOUS_DB_ACQUIRE_TIMEOUT_SECS");

        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }
}
