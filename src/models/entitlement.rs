use serde::{Deserialize, Serialize};

/// The entitlement columns of a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntitlement {
    pub user_id: String,
    pub plan: Option<String>,
    pub levels: Vec<String>,
    pub access: bool,
    pub blocked: bool,
    pub access_until: Option<i64>,
    pub updated_at: i64,
}

impl UserEntitlement {
    /// Whether the user can use granted content at `now`.
    pub fn is_active(&self, now: i64) -> bool {
        self.access && !self.blocked && self.access_until.is_some_and(|until| until > now)
    }
}

/// Result of a successful redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub plan: String,
    pub levels: Vec<String>,
    pub access_until: i64,
}
