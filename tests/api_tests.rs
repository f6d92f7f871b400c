mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::*;
use places_portal::{auth, config::AppConfig, create_router, models::User};
use serde_json::{Value, json};
use tokio::test;
use tower::util::ServiceExt;

fn test_user() -> User {
    User {
        id: TEST_USER_ID,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role: "user".to_string(),
        ..User::default()
    }
}

fn test_router(repo_control: MockRepoControl) -> Router {
    let (state, _) = create_test_state(repo_control);
    create_router(state)
}

fn bearer_token() -> String {
    let token = auth::issue_token(TEST_USER_ID, &AppConfig::default()).unwrap();
    format!("Bearer {}", token)
}

/// Sends one request through the full router stack and returns status + parsed
/// JSON body.
async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[test]
async fn test_health_check() {
    let router = test_router(MockRepoControl::default());

    let (status, body) = send(
        router,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[test]
async fn test_unknown_route_gets_error_envelope() {
    let router = test_router(MockRepoControl::default());

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/api/does-not-exist")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}

#[test]
async fn test_place_listing_envelope_and_wire_casing() {
    let router = test_router(MockRepoControl {
        listing_to_return: (vec![place_owned_by(TEST_USER_ID)], 1),
        ..MockRepoControl::default()
    });

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/api/places?limit=20&page=1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 1);

    // The wire contract is camelCase with a nested image object.
    let item = &body["data"][0];
    assert!(item["createdBy"].is_string());
    assert!(item["averageRating"].is_number());
    assert!(item["reviewCount"].is_number());
    assert!(item["createdAt"].is_string());
    assert!(item["image"].is_object());
    assert!(item["reviews"].is_array());
}

#[test]
async fn test_protected_route_requires_token() {
    let router = test_router(MockRepoControl::default());

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[test]
async fn test_me_with_valid_token() {
    let router = test_router(MockRepoControl {
        user_to_return: Some(test_user()),
        ..MockRepoControl::default()
    });

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, bearer_token())
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "test@example.com");
    // The hash must never appear on the wire, under any key.
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[test]
async fn test_create_place_validation_errors_on_empty_body() {
    let router = test_router(MockRepoControl {
        user_to_return: Some(test_user()),
        ..MockRepoControl::default()
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/places")
            .header(header::AUTHORIZATION, bearer_token())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "title"));
    assert!(errors.iter().any(|e| e["field"] == "image.src"));
    assert!(errors.iter().any(|e| e["field"] == "longitude"));
}

#[test]
async fn test_register_rejects_bad_email() {
    let router = test_router(MockRepoControl::default());

    let payload = json!({
        "name": "New User",
        "email": "not-an-email",
        "password": "secret123",
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "email"));
}

#[test]
async fn test_register_returns_token_and_sanitized_user() {
    let router = test_router(MockRepoControl::default());

    let payload = json!({
        "name": "New User",
        "email": "new@example.com",
        "password": "secret123",
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "new@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[test]
async fn test_register_duplicate_email_is_400() {
    let router = test_router(MockRepoControl {
        user_by_email: Some(test_user()),
        ..MockRepoControl::default()
    });

    let payload = json!({
        "name": "New User",
        "email": "test@example.com",
        "password": "secret123",
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
}

#[test]
async fn test_nearby_bad_coordinates_envelope() {
    let router = test_router(MockRepoControl::default());

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/api/places/nearby/east/52.52")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid coordinates");
}

#[test]
async fn test_delete_review_not_author_is_403() {
    // The token belongs to TEST_USER_ID; the review belongs to someone else.
    let router = test_router(MockRepoControl {
        user_to_return: Some(test_user()),
        review_to_return: Some(review_by(TEST_OTHER_ID)),
        ..MockRepoControl::default()
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/reviews/{}", TEST_REVIEW_ID))
            .header(header::AUTHORIZATION, bearer_token())
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authorized to delete this review");
}

#[test]
async fn test_delete_place_cascade_envelope() {
    let router = test_router(MockRepoControl {
        user_to_return: Some(test_user()),
        place_to_return: Some(place_owned_by(TEST_USER_ID)),
        ..MockRepoControl::default()
    });

    let (status, body) = send(
        router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/places/{}", TEST_PLACE_ID))
            .header(header::AUTHORIZATION, bearer_token())
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!({}));
    assert_eq!(
        body["message"],
        "Place and associated reviews deleted successfully"
    );
}
