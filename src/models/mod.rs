mod entitlement;
mod promo_code;

pub use entitlement::*;
pub use promo_code::*;
