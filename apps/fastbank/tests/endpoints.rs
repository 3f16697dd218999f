//! End-to-end tests for the banking API, exercising both variants
//! through full login/session flows.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use fastbank::config::Variant;
use fastbank::db::hash_password;
use fastbank::{AppState, create_router};
use tower::ServiceExt;

fn make_state(variant: Variant) -> AppState {
    let state = AppState::new(variant).unwrap();
    // A second user so cross-user leaks are observable.
    {
        let conn = state.db.lock().unwrap();
        conn.execute(
            "INSERT INTO users (username, password_hash, email) VALUES (?1, ?2, ?3)",
            rusqlite::params!["bob", hash_password("hunter2"), "bob@example.com"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (user_id, amount, description) VALUES (2, 9000, 'Payroll')",
            [],
        )
        .unwrap();
    }
    state
}

fn make_app(variant: Variant) -> Router {
    create_router(make_state(variant))
}

fn json_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_post(
            "/login",
            format!("{{\"username\":{username:?},\"password\":{password:?}}}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let raw = response
        .headers()
        .get(SET_COOKIE)
        .expect("login must set a cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn full_session_flow() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;

    let response = get_with_cookie(&app, "/me", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "alice");

    let response = get_with_cookie(&app, "/transactions", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn transactions_are_scoped_to_the_session_user() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "bob", "hunter2").await;

    let response = get_with_cookie(&app, "/transactions", &cookie).await;
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["description"], "Payroll");
}

#[tokio::test]
async fn transaction_search_injection_leaks_only_when_insecure() {
    let probe = "/transactions?q=x%25%27%20OR%20description%20LIKE%20%27%25";

    // Insecure: alice's search returns bob's payroll row.
    let app = make_app(Variant::Insecure);
    let cookie = login(&app, "alice", "password123").await;
    let response = get_with_cookie(&app, probe, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(
        json.as_array()
            .unwrap()
            .iter()
            .any(|t| t["description"] == "Payroll"),
        "insecure variant should leak other users' rows"
    );

    // Hardened: the same probe matches nothing.
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;
    let response = get_with_cookie(&app, probe, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn feedback_roundtrip_preserves_script_tags() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;
    let payload = "<script>alert(1)</script>";

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header(COOKIE, &cookie)
                .header("content-type", "application/json")
                .body(Body::from(format!("{{\"comment\":{payload:?}}}")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(&app, "/feedback", &cookie).await;
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows[0]["user"], "alice");
    assert_eq!(rows[0]["comment"], payload);
}

#[tokio::test]
async fn feedback_requires_session() {
    let app = make_app(Variant::Hardened);
    let response = app
        .oneshot(json_post(
            "/feedback",
            "{\"comment\":\"anonymous\"}".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_email_validates_and_updates() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/change-email")
                .header(COOKIE, &cookie)
                .header("content-type", "application/json")
                .body(Body::from("{\"email\":\"not-an-email\"}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/change-email")
                .header(COOKIE, &cookie)
                .header("content-type", "application/json")
                .body(Body::from("{\"email\":\"alice@new.example\"}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "alice@new.example");

    let response = get_with_cookie(&app, "/me", &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["email"], "alice@new.example");
}

#[tokio::test]
async fn insecure_session_token_is_predictable() {
    let app = make_app(Variant::Insecure);
    let cookie = login(&app, "alice", "password123").await;

    // `sid=alice-<millis>` - knowing the username and the clock is
    // enough to guess it.
    assert!(cookie.starts_with("sid=alice-"));
}

#[tokio::test]
async fn hardened_session_token_is_opaque() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;

    assert!(!cookie.contains("alice"));
    let token = cookie.strip_prefix("sid=").unwrap();
    assert!(uuid::Uuid::parse_str(token).is_ok());
}

#[tokio::test]
async fn sessions_survive_across_requests_without_expiry() {
    let app = make_app(Variant::Hardened);
    let cookie = login(&app, "alice", "password123").await;

    for _ in 0..3 {
        let response = get_with_cookie(&app, "/me", &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
