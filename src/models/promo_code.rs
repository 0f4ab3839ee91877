use serde::{Deserialize, Serialize};

use crate::error::RedemptionBlocked;
use crate::plans::{PlanDefinition, resolve_plan};

/// A stored promo code, keyed by its normalized (trimmed, lowercase) text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    /// Inactive codes cannot be redeemed
    pub active: bool,
    /// Single-use codes are redeemable only while `used_at` is unset
    pub single_use: bool,
    pub expires_at: Option<i64>,
    /// Plan identifier, resolved through the plan table at redemption time
    pub plan: String,
    pub used_at: Option<i64>,
    pub used_by: Option<String>,
    pub created_at: i64,
}

impl PromoCode {
    /// Check whether this code can be redeemed at `now` and resolve its plan.
    ///
    /// Expiry is strict: a code is still valid at exactly `expires_at`.
    pub fn check_redeemable(&self, now: i64) -> Result<&'static PlanDefinition, RedemptionBlocked> {
        if !self.active {
            return Err(RedemptionBlocked::Inactive);
        }
        if self.single_use && self.used_at.is_some() {
            return Err(RedemptionBlocked::AlreadyUsed);
        }
        if self.expires_at.is_some_and(|exp| now > exp) {
            return Err(RedemptionBlocked::Expired);
        }
        resolve_plan(&self.plan).ok_or_else(|| RedemptionBlocked::UnknownPlan(self.plan.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePromoCode {
    pub code: String,
    pub plan: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub single_use: bool,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

fn default_true() -> bool {
    true
}
