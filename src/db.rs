use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// Shared r2d2 pool the repositories check connections out of.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the pool eagerly at startup; a storefront without its product
/// store is not worth starting.
pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .expect("Failed to create database connection pool")
}
