//! Promo code redemption for an authenticated caller.

use rusqlite::Connection;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::jwt::CallerIdentity;
use crate::models::Redemption;
use crate::util::normalize_code;

/// Redeem `raw_code` for `caller` at `now` (unix seconds).
///
/// An empty code is rejected before the store is touched. Everything else
/// happens in [`queries::redeem_promo_code_atomic`].
pub fn redeem(
    conn: &mut Connection,
    caller: &CallerIdentity,
    raw_code: &str,
    now: i64,
) -> Result<Redemption> {
    let code = normalize_code(raw_code)
        .ok_or_else(|| AppError::InvalidArgument("Introduce un código.".into()))?;

    match queries::redeem_promo_code_atomic(conn, &caller.uid, &code, now) {
        Ok(redemption) => {
            tracing::info!(
                uid = %caller.uid,
                code = %code,
                plan = %redemption.plan,
                access_until = redemption.access_until,
                "Promo code redeemed"
            );
            Ok(redemption)
        }
        Err(e @ (AppError::NotFound(_) | AppError::FailedPrecondition(_))) => {
            tracing::warn!(uid = %caller.uid, code = %code, "Promo code rejected: {}", e);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::error::RedemptionBlocked;
    use crate::models::CreatePromoCode;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn caller(uid: &str) -> CallerIdentity {
        CallerIdentity { uid: uid.into() }
    }

    fn add_code(conn: &Connection, code: &str, plan: &str, single_use: bool) {
        queries::create_promo_code(
            conn,
            &CreatePromoCode {
                code: code.into(),
                plan: plan.into(),
                active: true,
                single_use,
                expires_at: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_empty_code_is_invalid_argument() {
        let mut conn = setup();
        let err = redeem(&mut conn, &caller("u1"), "   ", 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_code_is_normalized_before_lookup() {
        let mut conn = setup();
        add_code(&conn, "verano", "free", false);
        let redemption = redeem(&mut conn, &caller("u1"), "  VERANO ", 1_704_067_200).unwrap();
        assert_eq!(redemption.plan, "free");
    }

    #[test]
    fn test_second_single_use_redemption_fails() {
        let mut conn = setup();
        add_code(&conn, "once", "premium", true);
        redeem(&mut conn, &caller("u1"), "once", 1_704_067_200).unwrap();
        let err = redeem(&mut conn, &caller("u2"), "once", 1_704_067_300).unwrap_err();
        assert!(matches!(
            err,
            AppError::FailedPrecondition(RedemptionBlocked::AlreadyUsed)
        ));
    }
}
