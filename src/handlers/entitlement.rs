use axum::{Extension, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::jwt::CallerIdentity;
use crate::util::to_iso8601;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    pub plan: Option<String>,
    pub levels: Vec<String>,
    pub access: bool,
    pub blocked: bool,
    pub access_until: Option<String>,
    /// access granted, not blocked and not yet expired
    pub active: bool,
}

/// GET /me/entitlement
pub async fn get_my_entitlement(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<EntitlementResponse>> {
    let conn = state.db.get()?;

    let entitlement = queries::get_user_entitlement(&conn, &caller.uid)?
        .ok_or_else(|| AppError::NotFound("No tienes ningún plan activo.".into()))?;

    let now = Utc::now().timestamp();
    let active = entitlement.is_active(now);

    Ok(Json(EntitlementResponse {
        plan: entitlement.plan,
        levels: entitlement.levels,
        access: entitlement.access,
        blocked: entitlement.blocked,
        access_until: entitlement.access_until.map(to_iso8601),
        active,
    }))
}
