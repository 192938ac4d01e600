use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health.
///
/// Executes a `SELECT 1` against the pool, which verifies both connection
/// acquisition and query execution. The acquire timeout configured on the
/// pool bounds how long this can block.
///
/// # Example
/// ```ignore
/// use database::postgres::check_health;
///
/// match check_health(&db).await {
///     Ok(_) => { /* report connected */ }
///     Err(e) => { /* report disconnected: e */ }
/// }
/// ```
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

// Note: actual database health check tests require a running database and
// live in the integration test suites of the crates that use this.
