use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;

/// Dev tokens live for an hour.
const DEV_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
pub struct DevTokenRequest {
    pub uid: String,
}

#[derive(Debug, Serialize)]
pub struct DevToken {
    pub token: String,
    pub expires_in: u64,
}

/// POST /dev/token - mint a caller token for local testing
pub async fn create_dev_token(
    State(state): State<AppState>,
    Json(input): Json<DevTokenRequest>,
) -> Result<Json<DevToken>> {
    let uid = input.uid.trim();
    if uid.is_empty() {
        return Err(AppError::InvalidArgument("uid is required".into()));
    }

    let token = state.caller_keys.issue(uid, DEV_TOKEN_TTL_SECS)?;

    tracing::info!("DEV: Issued caller token for {}", uid);

    Ok(Json(DevToken {
        token,
        expires_in: DEV_TOKEN_TTL_SECS,
    }))
}
