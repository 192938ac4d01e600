use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(i32),

    #[error("Item with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Classify SeaORM errors into the domain taxonomy.
///
/// A unique-constraint violation means another writer won the race on the
/// item name; connection failures become `Unavailable`. Everything else is
/// an unexpected store error.
impl From<DbErr> for ItemError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return ItemError::DuplicateName("item name".to_string());
        }

        match &err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => ItemError::Unavailable(err.to_string()),
            _ => ItemError::Database(err.to_string()),
        }
    }
}

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::DuplicateName(name) => {
                AppError::Conflict(format!("Item with name '{}' already exists", name))
            }
            ItemError::Validation(msg) => AppError::BadRequest(msg),
            ItemError::Unavailable(msg) => {
                AppError::ServiceUnavailable(format!("Database unavailable: {}", msg))
            }
            ItemError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_response() {
        let response = ItemError::NotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_name_response() {
        let response = ItemError::DuplicateName("Laptop".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_response() {
        let response = ItemError::Validation("price must be greater than zero".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unavailable_response() {
        let response = ItemError::Unavailable("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_database_response() {
        let response = ItemError::Database("syntax error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
