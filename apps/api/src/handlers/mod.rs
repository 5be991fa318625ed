//! HTTP handlers and routing.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /health                    public                                 │
//! │  GET  /api/book                  public                                 │
//! │  POST /api/customer/register     public                                 │
//! │  POST /api/customer/login        public                                 │
//! │  ─────────────────────────────── require_auth ───────────────────────── │
//! │  POST /api/order                 CustomerContext                        │
//! │  GET  /api/order/order-history   CustomerContext                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Successful responses share one envelope: `status_code`, `message` and
//! either `data` or `token`.

pub mod book;
pub mod customer;
pub mod order;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::AppState;

const SUCCESS: &str = "success";

/// `{status_code, message, data}`
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(DataResponse {
            status_code: StatusCode::OK.as_u16(),
            message: SUCCESS.to_string(),
            data,
        })
    }
}

/// `{status_code, message, token}`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub status_code: u16,
    pub message: String,
    pub token: String,
}

impl TokenResponse {
    pub fn ok(token: String) -> Json<Self> {
        Json(TokenResponse {
            status_code: StatusCode::OK.as_u16(),
            message: SUCCESS.to_string(),
            token,
        })
    }
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/order", post(order::create_order))
        .route("/api/order/order-history", get(order::order_history))
        .route_layer(middleware::from_fn_with_state(state.jwt.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .route("/api/book", get(book::list_books))
        .route("/api/customer/register", post(customer::register))
        .route("/api/customer/login", post(customer::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `OK` while the database answers.
async fn health(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    if state.db.health_check().await {
        Ok("OK")
    } else {
        Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "database unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtManager;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use shelf_core::NewBook;
    use shelf_db::{Database, DbConfig};
    use tower::ServiceExt;

    const PASSWORD: &str = "Secr3t!pass";

    struct TestApp {
        router: Router,
        book_id: i64,
    }

    async fn app() -> TestApp {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category_id = db.books().insert_category("Fiction").await.unwrap();
        let book_id = db
            .books()
            .insert(&NewBook {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                price_cents: 1000,
                category_id,
            })
            .await
            .unwrap();

        let jwt = Arc::new(JwtManager::new("test-secret".to_string(), 3600));
        let state = Arc::new(AppState::new(db, jwt, None));

        TestApp {
            router: router(state),
            book_id,
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(router: &Router, email: &str) -> (StatusCode, Value) {
        send(
            router,
            Method::POST,
            "/api/customer/register",
            None,
            Some(json!({ "email": email, "password": PASSWORD, "username": "reader_1" })),
        )
        .await
    }

    fn order_body(book_id: i64, quantity: i64) -> Value {
        json!({
            "items": [{ "book_id": book_id, "quantity": quantity }],
            "address": "A",
            "city": "C",
            "district": "D",
            "postal_code": "Z",
            "shipper": "JNE",
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_books() {
        let app = app().await;
        let (status, json) = send(&app.router, Method::GET, "/api/book", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"][0]["title"], "Dune");
        assert_eq!(json["data"][0]["price"], 10.0);
        assert_eq!(json["data"][0]["category"], "Fiction");
    }

    #[tokio::test]
    async fn test_order_requires_token() {
        let app = app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            None,
            Some(order_body(app.book_id, 1)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["status_code"], 401);
        assert_eq!(json["message"], "insert token please");
    }

    #[tokio::test]
    async fn test_history_rejects_bad_token() {
        let app = app().await;
        let (status, json) = send(
            &app.router,
            Method::GET,
            "/api/order/order-history",
            Some("not-a-jwt"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "invalid token");
    }

    #[tokio::test]
    async fn test_register_order_history_flow() {
        let app = app().await;

        let (status, json) = register(&app.router, "reader@example.com").await;
        assert_eq!(status, StatusCode::OK);
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(order_body(app.book_id, 5)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "success");
        let order_id = json["data"]["order_id"].as_i64().unwrap();
        assert_eq!(json["data"]["customer_reference"].as_str().unwrap().len(), 8);
        assert!(json["data"]["tracking_number"]
            .as_str()
            .unwrap()
            .starts_with("JNE-"));

        let (status, json) = send(
            &app.router,
            Method::GET,
            "/api/order/order-history",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let orders = json["data"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["order_id"], order_id);
        assert_eq!(orders[0]["total_item"], 5);
        assert_eq!(orders[0]["total_price"], 50.0);
        assert_eq!(orders[0]["receiver_name"], "reader_1");
        assert_eq!(orders[0]["items"][0]["title"], "Dune");
        assert_eq!(orders[0]["items"][0]["quantity"], 5);
    }

    #[tokio::test]
    async fn test_bulk_order_accepted() {
        let app = app().await;
        let (_, json) = register(&app.router, "reader@example.com").await;
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(order_body(app.book_id, 1000)),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");

        let (_, json) = send(
            &app.router,
            Method::GET,
            "/api/order/order-history",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(json["data"][0]["total_item"], 1000);
        assert_eq!(json["data"][0]["total_price"], 10000.0);
    }

    #[tokio::test]
    async fn test_order_total_overflow_is_bad_request() {
        let app = app().await;
        let (_, json) = register(&app.router, "reader@example.com").await;
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(order_body(app.book_id, i64::MAX)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "total price is too large");
    }

    #[tokio::test]
    async fn test_order_validation_errors() {
        let app = app().await;
        let (_, json) = register(&app.router, "reader@example.com").await;
        let token = json["token"].as_str().unwrap().to_string();

        let mut missing_city = order_body(app.book_id, 1);
        missing_city["city"] = json!("");
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(missing_city),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status_code"], 400);
        assert_eq!(json["message"], "receiver city cannot be empty");

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(json!({ "items": [], "address": "A", "city": "C", "district": "D", "postal_code": "Z" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "items cannot be empty");

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/order",
            Some(&token),
            Some(order_body(9999, 1)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app().await;
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/customer/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_input_and_duplicates() {
        let app = app().await;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/customer/register",
            None,
            Some(json!({ "email": "reader@example.com", "password": "short", "username": "reader_1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = register(&app.router, "reader@example.com").await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = register(&app.router, "Reader@Example.com").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "email already exists");
    }

    #[tokio::test]
    async fn test_login() {
        let app = app().await;
        register(&app.router, "reader@example.com").await;

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/customer/login",
            None,
            Some(json!({ "email": "reader@example.com", "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/customer/login",
            None,
            Some(json!({ "email": "reader@example.com", "password": "Wr0ng!pass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "invalid password");
    }
}
