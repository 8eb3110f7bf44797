//! Integration tests for the storefront quote flow.
//!
//! The quote draft lives in a session; these tests run the real router with
//! an in-memory session store and carry the session cookie between requests
//! the way a browser would.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use soundhaus_integration_tests::storefront_state;

fn quote_router() -> Router {
    soundhaus_storefront::routes::routes()
        .layer(SessionManagerLayer::new(MemoryStore::default()))
        .with_state(storefront_state())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Extract the bare `name=value` pair from a Set-Cookie header.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .expect("header is ASCII")
        .split(';')
        .next()
        .expect("cookie has a value")
        .to_string()
}

fn put_json(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    builder.body(Body::from(body.to_string())).expect("request builds")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    builder.body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn test_fresh_session_has_blank_draft() {
    let response = quote_router()
        .oneshot(get("/api/quote", None))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let draft = body_json(response).await;
    assert_eq!(draft["customPrice"], "");
    assert_eq!(draft["notes"], "");
    assert_eq!(draft["preferredDate"], "");
    assert_eq!(draft["preferredTime"], "");
    assert_eq!(draft["address"]["street"], "");
}

#[tokio::test]
async fn test_setters_accumulate_and_address_merges() {
    let router = quote_router();

    // Set the price; the response establishes the session.
    let response = router
        .clone()
        .oneshot(put_json("/api/quote/price", None, r#"{"value": "150.00"}"#))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let draft = body_json(response).await;
    assert_eq!(draft["customPrice"], "150.00");

    // Street first...
    let response = router
        .clone()
        .oneshot(put_json(
            "/api/quote/address",
            Some(&cookie),
            r#"{"street": "1 Main St"}"#,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    // ...then city: the street must survive the second patch.
    let response = router
        .clone()
        .oneshot(put_json(
            "/api/quote/address",
            Some(&cookie),
            r#"{"city": "Metropolis"}"#,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let draft = body_json(response).await;
    assert_eq!(draft["address"]["street"], "1 Main St");
    assert_eq!(draft["address"]["city"], "Metropolis");
    assert_eq!(draft["address"]["state"], "");
    assert_eq!(draft["address"]["zip"], "");

    // Earlier fields are untouched by address patches.
    let response = router
        .clone()
        .oneshot(get("/api/quote", Some(&cookie)))
        .await
        .expect("router responds");
    let draft = body_json(response).await;
    assert_eq!(draft["customPrice"], "150.00");
}

#[tokio::test]
async fn test_reset_restores_blank_state() {
    let router = quote_router();

    let response = router
        .clone()
        .oneshot(put_json("/api/quote/notes", None, r#"{"value": "Fix hum"}"#))
        .await
        .expect("router responds");
    let cookie = session_cookie(&response);

    let response = router
        .clone()
        .oneshot(put_json(
            "/api/quote/address",
            Some(&cookie),
            r#"{"street": "1 Main St", "zip": "10001"}"#,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/quote")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let draft = body_json(response).await;
    assert_eq!(draft["notes"], "");
    assert_eq!(draft["address"]["street"], "");
    assert_eq!(draft["address"]["zip"], "");

    // And it stays blank on the next read.
    let response = router
        .clone()
        .oneshot(get("/api/quote", Some(&cookie)))
        .await
        .expect("router responds");
    let draft = body_json(response).await;
    assert_eq!(draft["customPrice"], "");
}

#[tokio::test]
async fn test_setter_requires_value_field() {
    let response = quote_router()
        .oneshot(put_json("/api/quote/price", None, "{}"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required field: value");
}

#[tokio::test]
async fn test_checkout_validates_before_touching_storage() {
    // Missing customer fields reject immediately.
    let response = quote_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required field: customer_name");

    // An empty order (no items, no service) is rejected too.
    let response = quote_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"customer_name": "Ada", "customer_email": "ada@example.com"}"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Order must contain at least one item or a service request"
    );
}

#[tokio::test]
async fn test_checkout_rejects_bad_lines_before_storage() {
    let response = quote_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{
                        "customer_name": "Ada",
                        "customer_email": "ada@example.com",
                        "items": [{"product_id": 1, "quantity": 0}]
                    }"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid quantity for product 1: 0");
}
