use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use server::{app, config::Config, state::AppState};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> Router {
    let config = Config {
        database_url: "postgres://localhost/unused".to_string(),
        oidc_issuer_url: "https://idp.example.com".to_string(),
        bind_address: "127.0.0.1:0".parse().unwrap(),
        admin_subjects: vec![],
        run_migrations: false,
    };

    // No resource server layer, so protected routes never see claims
    app(
        AppState::new(DatabaseConnection::Disconnected, config),
        |routes| routes,
    )
}

async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = test_app()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_error(body: &Value, code: u16) {
    assert_eq!(body["code"], code);
    assert_eq!(body["status"], "error");
    assert!(body["data"].is_null());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_health_is_wrapped() {
    let (status, body) = send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "code": 200,
            "status": "success",
            "message": "Service is healthy",
            "data": "OK"
        })
    );
}

#[tokio::test]
async fn test_invalid_pagination_is_rejected() {
    let (status, body) = send(Method::GET, "/courses?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400);

    let (status, body) = send(Method::GET, "/courses?per_page=500", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400);

    let (status, body) = send(Method::GET, "/courses?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400);
}

#[tokio::test]
async fn test_malformed_course_id_is_rejected() {
    let (status, body) = send(Method::GET, "/courses/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400);
}

#[tokio::test]
async fn test_database_failure_is_redacted() {
    let uri = format!("/courses/{}", Uuid::new_v4());
    let (status, body) = send(Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error(&body, 500);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_protected_routes_need_claims() {
    let enrollment = format!("/enrollments/{}", Uuid::new_v4());
    let cases = [
        (Method::GET, "/me".to_string(), None),
        (Method::GET, "/enrollments".to_string(), None),
        (
            Method::POST,
            "/enrollments".to_string(),
            Some(json!({ "courseId": Uuid::new_v4() })),
        ),
        (Method::GET, enrollment.clone(), None),
        (Method::DELETE, enrollment, None),
        (
            Method::POST,
            "/courses".to_string(),
            Some(json!({ "title": "Rust" })),
        ),
    ];

    for (method, uri, body) in cases {
        let (status, response) = send(method, &uri, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_error(&response, 401);
    }
}

#[tokio::test]
async fn test_openapi_lists_both_routers() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    let paths = &doc["paths"];

    assert!(paths["/health"]["get"].is_object());
    assert!(paths["/courses"]["get"].is_object());
    assert!(paths["/courses"]["post"].is_object());
    assert!(paths["/enrollments/{id}"]["get"].is_object());
    assert!(paths["/enrollments/{id}"]["delete"].is_object());
    assert!(paths["/enrollments/{id}/complete"]["post"].is_object());
    assert!(doc["components"]["securitySchemes"]["jwt"].is_object());
}
