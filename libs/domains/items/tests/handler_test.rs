//! Handler tests for the items domain
//!
//! These tests verify that the HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! Unlike E2E tests, these test ONLY the items domain handlers,
//! not the full application with routing, middleware, etc.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::{TestDatabase, TestDataBuilder};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_item_handler_returns_201() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let app = handlers::router(service);

    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let name = builder.name("item", "main");

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": name,
                "description": "Handler test",
                "price": 19.99
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let created: ItemResponse = json_body(response.into_body()).await;
    assert_eq!(created.item.name, name);
    assert_eq!(created.item.description, "Handler test");
    assert_eq!(created.item.price, 19.99);
    assert_eq!(created.created_at_formatted, "a few seconds ago");
}

#[tokio::test]
async fn test_create_item_handler_validates_input() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let app = handlers::router(service);

    // Invalid name (whitespace only)
    let response = app
        .oneshot(post_json("/", json!({"name": "   ", "price": 1.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_item_handler_rejects_bad_price() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_bad_price");

    for (suffix, price) in [("zero", 0.0), ("negative", -2.5)] {
        let app = handlers::router(service.clone());
        let response = app
            .oneshot(post_json(
                "/",
                json!({"name": builder.name("item", suffix), "price": price}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {}", price);
    }
}

#[tokio::test]
async fn test_create_item_handler_duplicate_returns_409() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_duplicate");

    let name = builder.name("item", "dup");
    let payload = json!({"name": name, "price": 5.0});

    let app = handlers::router(service.clone());
    let response = app.oneshot(post_json("/", payload.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = handlers::router(service);
    let response = app.oneshot(post_json("/", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_item_handler() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_get");

    let created = service
        .create_item(CreateItem {
            name: builder.name("item", "main"),
            description: String::new(),
            price: 3.0,
        })
        .await
        .unwrap();

    let app = handlers::router(service);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}", created.item.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let fetched: ItemResponse = json_body(response.into_body()).await;
    assert_eq!(fetched.item.id, created.item.id);
}

#[tokio::test]
async fn test_get_item_handler_missing_returns_404() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let app = handlers::router(service);

    let response = app
        .oneshot(Request::builder().uri("/999999").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_item_handler_bad_id_returns_400() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let app = handlers::router(service);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_item_handler() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_update");

    let created = service
        .create_item(CreateItem {
            name: builder.name("item", "main"),
            description: "before".to_string(),
            price: 3.0,
        })
        .await
        .unwrap();

    let app = handlers::router(service);
    let response = app
        .oneshot(put_json(
            &format!("/{}", created.item.id),
            json!({"description": "after", "price": 4.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: ItemResponse = json_body(response.into_body()).await;
    assert_eq!(updated.item.name, created.item.name);
    assert_eq!(updated.item.description, "after");
    assert_eq!(updated.item.price, 4.0);
}

#[tokio::test]
async fn test_update_item_handler_without_price_returns_400() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_update_no_price");

    let created = service
        .create_item(CreateItem {
            name: builder.name("item", "main"),
            description: String::new(),
            price: 3.0,
        })
        .await
        .unwrap();

    // Current contract: price must accompany every update
    let app = handlers::router(service);
    let response = app
        .oneshot(put_json(
            &format!("/{}", created.item.id),
            json!({"description": "only description"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_item_handler_name_conflict_returns_409() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_update_conflict");

    let taken = builder.name("item", "taken");
    service
        .create_item(CreateItem {
            name: taken.clone(),
            description: String::new(),
            price: 1.0,
        })
        .await
        .unwrap();
    let other = service
        .create_item(CreateItem {
            name: builder.name("item", "other"),
            description: String::new(),
            price: 1.0,
        })
        .await
        .unwrap();

    let app = handlers::router(service);
    let response = app
        .oneshot(put_json(
            &format!("/{}", other.item.id),
            json!({"name": taken, "price": 1.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_item_handler_returns_confirmation() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_delete");

    let created = service
        .create_item(CreateItem {
            name: builder.name("item", "doomed"),
            description: String::new(),
            price: 1.0,
        })
        .await
        .unwrap();

    let app = handlers::router(service.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", created.item.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let confirmation: DeleteConfirmation = json_body(response.into_body()).await;
    assert!(confirmation.message.contains(&created.item.id.to_string()));

    // Deleting again is a 404
    let app = handlers::router(service);
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", created.item.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_items_handler() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("handler_list");

    for suffix in ["a", "b"] {
        service
            .create_item(CreateItem {
                name: builder.name("item", suffix),
                description: String::new(),
                price: 1.0,
            })
            .await
            .unwrap();
    }

    let app = handlers::router(service);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let items: Vec<ItemResponse> = json_body(response.into_body()).await;
    assert_eq!(items.len(), 2);
}
