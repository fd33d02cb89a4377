mod support;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use roofline_backend::utils::jwt::create_session_token;
use support::test_app;

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn login_with_missing_fields_is_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(json_post(
            "/api/auth/login",
            serde_json::json!({"email": "", "password": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Email and password are required");
}

#[tokio::test]
async fn login_with_absent_fields_is_bad_request() {
    // A body that omits the password (or email) entirely gets the same 400
    // as one that sends it empty.
    let app = test_app();
    let response = app
        .oneshot(json_post(
            "/api/auth/login",
            serde_json::json!({"email": "a@example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Email and password are required");

    let app = test_app();
    let response = app
        .oneshot(json_post("/api/auth/login", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_blank_email_is_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(json_post(
            "/api/auth/login",
            serde_json::json!({"email": "   ", "password": "whatever"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Authentication required");
}

#[tokio::test]
async fn me_with_garbage_token_is_unauthorized() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, "token=not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Invalid or expired token");
}

#[tokio::test]
async fn me_with_token_signed_by_other_secret_is_unauthorized() {
    let app = test_app();
    let forged = create_session_token(
        "user-1".into(),
        "a@example.com".into(),
        "user".into(),
        "some-other-secret",
        24,
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("token={}", forged))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_token_cookie() {
    let app = test_app();
    let response = app
        .oneshot(json_post("/api/auth/logout", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(set_cookie.contains("HttpOnly"));

    let json = response_json(response).await;
    assert_eq!(json["message"], "Logged out");
}
