mod dev;
mod entitlement;
mod redeem;

pub use dev::*;
pub use entitlement::*;
pub use redeem::*;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::middleware::caller_auth;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState) -> Router {
    let caller_routes = Router::new()
        .route("/redeemPromoCode", post(redeem_promo_code))
        .route("/me/entitlement", get(get_my_entitlement))
        .route_layer(middleware::from_fn_with_state(state.clone(), caller_auth));

    let mut app = Router::new()
        .route("/health", get(health))
        .merge(caller_routes);

    if state.dev_mode {
        app = app.route("/dev/token", post(create_dev_token));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// CORS for the web client. Returns None when no origins are configured.
pub fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
