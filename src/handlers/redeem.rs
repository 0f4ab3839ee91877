use axum::{Extension, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::jwt::CallerIdentity;
use crate::redemption;
use crate::util::to_iso8601;

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub ok: bool,
    pub plan: String,
    pub levels: Vec<String>,
    pub access_until: String,
}

/// POST /redeemPromoCode
pub async fn redeem_promo_code(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    let mut conn = state.db.get()?;
    let now = Utc::now().timestamp();

    let redemption = redemption::redeem(&mut conn, &caller, &input.code, now)?;

    Ok(Json(RedeemResponse {
        ok: true,
        plan: redemption.plan,
        levels: redemption.levels,
        access_until: to_iso8601(redemption.access_until),
    }))
}
