//! Fixed plan table that promo codes resolve against.
//!
//! Each plan grants a set of course levels and an access window in days.
//! The table is compile-time data; codes pointing at an id that is not
//! listed here are treated as misconfigured and cannot be redeemed.

use std::str::FromStr;

use serde::Serialize;
use strum::{EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PlanId {
    Free,
    #[strum(serialize = "premium_a1", serialize = "premium_a1a2")]
    PremiumA1,
    #[strum(serialize = "premium_b1")]
    PremiumB1,
    #[strum(serialize = "premium_b2")]
    PremiumB2,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanDefinition {
    pub plan: &'static str,
    pub levels: &'static [&'static str],
    pub days: i64,
}

const FREE: PlanDefinition = PlanDefinition {
    plan: "free",
    levels: &["A1"],
    days: 7,
};

const PREMIUM_A1: PlanDefinition = PlanDefinition {
    plan: "premium_a1",
    levels: &["A1", "A2"],
    days: 30,
};

const PREMIUM_B1: PlanDefinition = PlanDefinition {
    plan: "premium_b1",
    levels: &["A2", "B1"],
    days: 30,
};

const PREMIUM_B2: PlanDefinition = PlanDefinition {
    plan: "premium_b2",
    levels: &["B1", "B2"],
    days: 30,
};

const PREMIUM: PlanDefinition = PlanDefinition {
    plan: "premium",
    levels: &["A1", "A2", "B1", "B2"],
    days: 365,
};

impl PlanId {
    pub fn definition(self) -> &'static PlanDefinition {
        match self {
            PlanId::Free => &FREE,
            PlanId::PremiumA1 => &PREMIUM_A1,
            PlanId::PremiumB1 => &PREMIUM_B1,
            PlanId::PremiumB2 => &PREMIUM_B2,
            PlanId::Premium => &PREMIUM,
        }
    }
}

/// Resolve a stored plan identifier. Case and surrounding whitespace are ignored.
pub fn resolve_plan(raw: &str) -> Option<&'static PlanDefinition> {
    let normalized = raw.trim().to_lowercase();
    PlanId::from_str(&normalized).ok().map(PlanId::definition)
}

/// All plan definitions, in table order.
pub fn all_plans() -> impl Iterator<Item = &'static PlanDefinition> {
    PlanId::iter().map(PlanId::definition)
}
