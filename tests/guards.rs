//! End-to-end guard behaviour through the composed router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth_gate::app::build_router;
use auth_gate::middleware::http::{HttpLimits, REQUEST_ID_HEADER};
use auth_gate::repos::error::RepoResult;
use auth_gate::repos::{InMemoryUserStore, UserRow, UserStore};
use auth_gate::services::auth::TokenVerifier;
use auth_gate::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &[u8] = b"integration-secret";
const BODY_LIMIT: usize = 64 * 1024;

fn app(users: Arc<dyn UserStore>) -> Router {
    let verifier = Arc::new(TokenVerifier::new(SECRET, 0).unwrap());
    let state = AppState::new(verifier, users, BODY_LIMIT);
    build_router(
        state,
        HttpLimits {
            body_limit_bytes: BODY_LIMIT,
            timeout: Duration::from_secs(5),
        },
    )
}

fn seeded() -> (Arc<InMemoryUserStore>, Uuid) {
    let store = Arc::new(InMemoryUserStore::new());
    store.insert("root", "admin");
    let bob = store.insert("bob", "student");
    (store, bob)
}

fn sign(secret: &[u8], payload: Value) -> String {
    jsonwebtoken::encode(&Header::default(), &payload, &EncodingKey::from_secret(secret)).unwrap()
}

fn token_for(role_name: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    sign(
        SECRET,
        json!({ "subject": 1, "username": "someone", "role_name": role_name, "exp": exp }),
    )
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_is_public() {
    let (store, _) = seeded();
    let app = app(store);

    let (status, body) = send(&app, request(Method::GET, "/api/v1/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn missing_token_is_required() {
    let (store, bob) = seeded();
    let app = app(store);

    for uri in ["/api/v1/users".to_string(), format!("/api/v1/users/{bob}")] {
        let (status, body) = send(&app, request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, json!({ "message": "Token required" }));
    }
}

#[tokio::test]
async fn bearer_scheme_without_token_is_required() {
    let (store, _) = seeded();
    let app = app(store);

    for value in ["Bearer ", "Bearer", "bearer    "] {
        let (status, body) = send(&app, request(Method::GET, "/api/v1/users", Some(value), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{value:?}");
        assert_eq!(body, json!({ "message": "Token required" }), "{value:?}");
    }
}

#[tokio::test]
async fn bad_or_expired_tokens_are_invalid() {
    let (store, _) = seeded();
    let app = app(store);

    let forged = sign(b"not-the-secret", json!({ "role_name": "admin", "exp": 4_000_000_000i64 }));
    let expired = sign(SECRET, json!({ "role_name": "admin", "exp": 1_000 }));

    for token in ["junk".to_string(), forged, format!("Bearer {expired}")] {
        let (status, body) =
            send(&app, request(Method::GET, "/api/v1/users", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Token invalid");
    }
}

#[tokio::test]
async fn valid_token_reaches_handler_with_or_without_scheme() {
    let (store, _) = seeded();
    let app = app(store);
    let token = token_for("student");

    for header_value in [token.clone(), format!("Bearer {token}")] {
        let (status, body) =
            send(&app, request(Method::GET, "/api/v1/users", Some(&header_value), None)).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["bob", "root"]);
    }
}

#[tokio::test]
async fn only_admin_may_read_a_user() {
    let (store, bob) = seeded();
    let app = app(store);
    let uri = format!("/api/v1/users/{bob}");

    let (status, body) = send(
        &app,
        request(Method::GET, &uri, Some(&token_for("student")), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "This is not for you" }));

    let (status, body) = send(
        &app,
        request(Method::GET, &uri, Some(&token_for("admin")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");
    assert_eq!(body["role_name"], "student");
}

#[tokio::test]
async fn token_without_role_is_forbidden() {
    let (store, bob) = seeded();
    let app = app(store);
    let token = sign(SECRET, json!({ "exp": chrono::Utc::now().timestamp() + 60 }));

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/api/v1/users/{bob}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (store, _) = seeded();
    let app = app(store);
    let uri = format!("/api/v1/users/{}", Uuid::new_v4());

    let (status, body) = send(
        &app,
        request(Method::GET, &uri, Some(&token_for("admin")), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "user not found");
}

#[tokio::test]
async fn role_assignment_normalizes_role_name() {
    let (store, bob) = seeded();
    let app = app(store.clone());
    let uri = format!("/api/v1/users/{bob}/role");
    let admin = token_for("admin");

    let cases = [
        (Some(json!({ "role_name": "  teacher " })), "teacher"),
        (Some(json!({ "role_name": "" })), "student"),
        (Some(json!({ "role_name": "   " })), "student"),
        (Some(json!({})), "student"),
        (None, "student"),
    ];

    for (body, expected) in cases {
        let (status, res) = send(&app, request(Method::PUT, &uri, Some(&admin), body.clone())).await;
        assert_eq!(status, StatusCode::OK, "{body:?}");
        assert_eq!(res["role_name"], expected, "{body:?}");
    }

    let row = store.find_by_id(bob).await.unwrap().unwrap();
    assert_eq!(row.role_name, "student");
}

#[tokio::test]
async fn invalid_role_names_are_unprocessable() {
    let (store, bob) = seeded();
    let app = app(store.clone());
    let uri = format!("/api/v1/users/{bob}/role");
    let admin = token_for("admin");

    let cases = [
        (json!({ "role_name": " admin  " }), "Role name can not be admin"),
        (
            json!({ "role_name": "x".repeat(33) }),
            "Role name can not be longer than 32 chars",
        ),
    ];

    for (body, expected) in cases {
        let (status, res) = send(&app, request(Method::PUT, &uri, Some(&admin), Some(body))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res, json!({ "message": expected }));
    }

    // Nothing was written.
    let row = store.find_by_id(bob).await.unwrap().unwrap();
    assert_eq!(row.role_name, "student");
}

#[tokio::test]
async fn guards_run_outermost_first() {
    let (store, bob) = seeded();
    let app = app(store);
    let uri = format!("/api/v1/users/{bob}/role");
    let body = json!({ "role_name": "admin" });

    // No token: the token check answers before role or body checks.
    let (status, res) = send(&app, request(Method::PUT, &uri, None, Some(body.clone()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(message(&res), "Token required");

    // Wrong role: the access gate answers before the role-name validator.
    let (status, res) = send(
        &app,
        request(Method::PUT, &uri, Some(&token_for("student")), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(message(&res), "This is not for you");
}

#[tokio::test]
async fn lookup_requires_existing_username() {
    let (store, _) = seeded();
    let app = app(store);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/users/lookup", None, Some(json!({ "username": "bob" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "username": "bob", "exists": true }));

    for payload in [json!({ "username": "mallory" }), json!({}), json!({ "username": 5 })] {
        let (status, body) = send(
            &app,
            request(Method::POST, "/api/v1/users/lookup", None, Some(payload.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{payload}");
        assert_eq!(body, json!({ "message": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn oversized_body_without_content_length_is_rejected_as_too_large() {
    let (store, _) = seeded();
    let app = app(store);

    // No Content-Length header: the size is only discovered while the guard buffers the body.
    let oversized = format!(r#"{{"username":"bob","pad":"{}"}}"#, "x".repeat(BODY_LIMIT * 2));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/lookup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(oversized))
        .unwrap();
    assert!(!req.headers().contains_key(header::CONTENT_LENGTH));

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "message": "Request body too large" }));
}

struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn find_by_username(&self, _username: &str) -> RepoResult<Option<UserRow>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_id(&self, _user_id: Uuid) -> RepoResult<Option<UserRow>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn assign_role(&self, _user_id: Uuid, _role_name: &str) -> RepoResult<Option<UserRow>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

#[tokio::test]
async fn store_outage_is_internal_not_unauthorized() {
    let app = app(Arc::new(UnavailableStore));

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/users/lookup", None, Some(json!({ "username": "bob" }))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "internal server error" }));
}

#[tokio::test]
async fn repeated_requests_get_the_same_answer() {
    let (store, bob) = seeded();
    let app = app(store);
    let uri = format!("/api/v1/users/{bob}");
    let token = token_for("student");

    let first = send(&app, request(Method::GET, &uri, Some(&token), None)).await;
    let second = send(&app, request(Method::GET, &uri, Some(&token), None)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (store, _) = seeded();
    let app = app(store);

    let res = app
        .oneshot(request(Method::GET, "/api/v1/users", None, None))
        .await
        .unwrap();
    assert!(res.headers().contains_key(REQUEST_ID_HEADER));
}
