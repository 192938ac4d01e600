//! Application state management

/// Shared application state.
///
/// Cloned for each handler; the database connection is a pool handle and is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
