#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::DateTime;
use rusqlite::{Connection, params};
use serde_json::Value;
use tower::ServiceExt;

pub use aquivivo_promo::db::{AppState, queries};
pub use aquivivo_promo::models::*;

use aquivivo_promo::db;
use aquivivo_promo::handlers;
use aquivivo_promo::jwt::CallerTokenKey;

pub const TEST_SECRET: &[u8] = b"aquivivo-test-secret";

pub fn ts(rfc3339: &str) -> i64 {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().timestamp()
}

pub fn test_keys() -> CallerTokenKey {
    CallerTokenKey::new(TEST_SECRET, None)
}

pub fn token_for(uid: &str) -> String {
    test_keys().issue(uid, 600).unwrap()
}

pub fn create_test_app_state() -> AppState {
    let pool = db::create_memory_pool().unwrap();
    {
        let conn = pool.get().unwrap();
        db::init_db(&conn).unwrap();
    }
    AppState {
        db: pool,
        caller_keys: test_keys(),
        dev_mode: false,
    }
}

pub fn app(state: AppState) -> Router {
    handlers::router(state)
}

pub fn create_test_code(conn: &Connection, code: &str, plan: &str, single_use: bool) -> PromoCode {
    queries::create_promo_code(
        conn,
        &CreatePromoCode {
            code: code.to_string(),
            plan: plan.to_string(),
            active: true,
            single_use,
            expires_at: None,
        },
    )
    .unwrap()
}

/// Insert a code row directly, bypassing plan validation.
pub fn insert_raw_code(
    conn: &Connection,
    code: &str,
    plan: &str,
    active: bool,
    expires_at: Option<i64>,
) {
    conn.execute(
        "INSERT INTO promo_codes (code, active, single_use, expires_at, plan, created_at)
         VALUES (?1, ?2, 0, ?3, ?4, 0)",
        params![code, active, expires_at, plan],
    )
    .unwrap();
}

pub fn set_access_until(conn: &Connection, uid: &str, access_until: i64) {
    conn.execute(
        "INSERT INTO users (id, plan, levels, access, blocked, access_until, updated_at, created_at)
         VALUES (?1, 'free', '[\"A1\"]', 1, 0, ?2, 0, 0)
         ON CONFLICT(id) DO UPDATE SET access_until = excluded.access_until",
        params![uid, access_until],
    )
    .unwrap();
}

pub async fn post_json(app: Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("Response should be valid JSON")
    };
    (status, json)
}
