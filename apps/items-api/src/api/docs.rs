//! Static API documentation endpoint
//!
//! A small endpoint manifest, served alongside the generated OpenAPI UIs.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router {
    Router::new().route("/docs", get(api_docs))
}

async fn api_docs() -> Json<Value> {
    Json(json!({
        "api_version": "1.0",
        "endpoints": [
            {
                "path": "/api/items",
                "methods": ["GET", "POST"],
                "description": "List all items or create a new one"
            },
            {
                "path": "/api/items/{id}",
                "methods": ["GET", "PUT", "DELETE"],
                "description": "Get, update or delete a specific item"
            },
            {
                "path": "/api/health",
                "methods": ["GET"],
                "description": "Check API and database status"
            }
        ]
    }))
}
