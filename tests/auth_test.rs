mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_logger_requires_auth() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // Should redirect to login
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/auth/login");
}

#[tokio::test]
async fn test_login_page_renders() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("Sign in"));
}

#[tokio::test]
async fn test_login_page_redirects_when_signed_in() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    let user = common::create_test_user(&pool, "lifter@example.com", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
}

#[tokio::test]
async fn test_login_valid_credentials() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    common::create_test_user(&pool, "lifter@example.com", "password123").await;

    let response = app
        .oneshot(form_post(
            "/auth/login",
            "email=lifter%40example.com&password=password123",
        ))
        .await
        .unwrap();

    // Should redirect to the logger on success
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    // Should set a session cookie
    let set_cookie = response.headers().get(header::SET_COOKIE);
    assert!(set_cookie.is_some());
    let cookie_str = set_cookie.unwrap().to_str().unwrap();
    assert!(cookie_str.contains("session="));
    assert!(cookie_str.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_session_cookie_opens_logger() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    common::create_test_user(&pool, "lifter@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/auth/login",
            "email=lifter%40example.com&password=password123",
        ))
        .await
        .unwrap();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    let cookie_header = common::extract_cookie_header(set_cookie);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, &cookie_header)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("lifter@example.com"));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    common::create_test_user(&pool, "lifter@example.com", "password123").await;

    let response = app
        .oneshot(form_post(
            "/auth/login",
            "email=lifter%40example.com&password=wrongpassword",
        ))
        .await
        .unwrap();

    // Should return OK with error message (not redirect)
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("Invalid email or password"));
    // The typed email is kept in the form
    assert!(body.contains("lifter@example.com"));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(form_post(
            "/auth/login",
            "email=nobody%40example.com&password=anypassword",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_register_creates_account_and_signs_in() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    let response = app
        .oneshot(form_post(
            "/auth/register",
            "email=New%40Example.com&password=secret1&display_name=Sam",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
    assert!(response.headers().get(header::SET_COOKIE).is_some());

    let user = gymlog::repositories::UserRepository::new(pool)
        .find_by_email("new@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn test_register_short_password_shows_error() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(form_post(
            "/auth/register",
            "email=new%40example.com&password=abc&display_name=",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("Password must be at least 6 characters"));
}

#[tokio::test]
async fn test_register_duplicate_email_shows_error() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    common::create_test_user(&pool, "taken@example.com", "password123").await;

    let response = app
        .oneshot(form_post(
            "/auth/register",
            "email=taken%40example.com&password=password123",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response.into_body()).await;
    assert!(body.contains("An account with this email already exists"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    let user = common::create_test_user(&pool, "lifter@example.com", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Should redirect to login
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/auth/login");

    let cookie_str = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie_str.contains("Max-Age=0") || cookie_str.contains("session=;"));

    // The old token no longer authenticates
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unknown_session_token_redirects() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/workouts")
                .header(header::COOKIE, "session=not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/auth/login");
}
