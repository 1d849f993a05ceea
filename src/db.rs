use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

use crate::config::DatabaseConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build a bounded connection pool. Fails if no connection can be
/// established within the configured acquisition timeout.
pub fn create_pool(config: &DatabaseConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.url);
    Pool::builder()
        .max_size(config.pool_max_size)
        .connection_timeout(config.pool_timeout)
        .build(manager)
}
