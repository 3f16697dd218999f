//! Integration tests for traversal protection on the read endpoints.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use filebox::{AppState, create_router};
use tempfile::TempDir;
use tower::ServiceExt;

/// A base directory with one served file plus a secret one level above.
struct Fixture {
    _root: TempDir,
    app: Router,
}

fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let served = root.path().join("files");
    std::fs::create_dir_all(served.join("notes")).unwrap();
    std::fs::write(served.join("hello.txt"), "Hello from safe file!\n").unwrap();
    std::fs::write(root.path().join("secret.txt"), "top secret").unwrap();

    let app = create_router(AppState::new(served));
    Fixture { _root: root, app }
}

fn read_request(uri: &str, filename: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(format!("{{\"filename\":{filename:?}}}")))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn validated_read_serves_files_inside_base() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read", "hello.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["content"], "Hello from safe file!\n");
}

#[tokio::test]
async fn validated_read_blocks_dotdot() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read", "../secret.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn validated_read_blocks_deep_dotdot() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read", "../../../../etc/passwd"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn validated_read_blocks_encoded_dotdot() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read", "%2e%2e/secret.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unvalidated_read_leaks_the_secret() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read-no-validate", "../secret.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["content"], "top secret");
}

#[tokio::test]
async fn unvalidated_read_missing_file_echoes_joined_path() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read-no-validate", "missing.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "file not found");
    assert!(
        json["path"].as_str().unwrap().ends_with("missing.txt"),
        "404 body should echo the joined path"
    );
}

#[tokio::test]
async fn validated_read_missing_file_does_not_echo_a_path() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(read_request("/read", "missing.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json.get("path").is_none());
}

#[tokio::test]
async fn setup_sample_writes_both_files() {
    let fx = fixture();

    let response = fx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/setup-sample")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);

    for filename in ["hello.txt", "notes/readme.md"] {
        let response = fx
            .app
            .clone()
            .oneshot(read_request("/read", filename))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "missing {filename}");
    }
}
