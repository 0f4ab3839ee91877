use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior, params};

use crate::error::{AppError, Result};
use crate::models::*;
use crate::plans::resolve_plan;
use crate::util::{extend_access_until, normalize_code};

use super::from_row::{PROMO_CODE_COLS, USER_ENTITLEMENT_COLS, query_all, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

// ============ Promo codes ============

/// Create a promo code. The code text is normalized and the plan must resolve.
pub fn create_promo_code(conn: &Connection, input: &CreatePromoCode) -> Result<PromoCode> {
    let code = normalize_code(&input.code)
        .ok_or_else(|| AppError::InvalidArgument("El código no puede estar vacío.".into()))?;

    if resolve_plan(&input.plan).is_none() {
        return Err(AppError::InvalidArgument(format!(
            "Plan desconocido: {}",
            input.plan
        )));
    }

    if get_promo_code(conn, &code)?.is_some() {
        return Err(AppError::InvalidArgument(format!(
            "El código {} ya existe.",
            code
        )));
    }

    let now = now();
    conn.execute(
        "INSERT INTO promo_codes (code, active, single_use, expires_at, plan, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&code, input.active, input.single_use, input.expires_at, &input.plan, now],
    )?;

    Ok(PromoCode {
        code,
        active: input.active,
        single_use: input.single_use,
        expires_at: input.expires_at,
        plan: input.plan.clone(),
        used_at: None,
        used_by: None,
        created_at: now,
    })
}

/// Look up a promo code by its normalized text.
pub fn get_promo_code(conn: &Connection, code: &str) -> Result<Option<PromoCode>> {
    query_one(
        conn,
        &format!("SELECT {} FROM promo_codes WHERE code = ?1", PROMO_CODE_COLS),
        params![code],
    )
}

pub fn list_promo_codes(conn: &Connection) -> Result<Vec<PromoCode>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM promo_codes ORDER BY created_at DESC, code",
            PROMO_CODE_COLS
        ),
        [],
    )
}

// ============ User entitlements ============

pub fn get_user_entitlement(conn: &Connection, user_id: &str) -> Result<Option<UserEntitlement>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_ENTITLEMENT_COLS),
        params![user_id],
    )
}

// ============ Redemption ============

/// Atomically redeem a promo code for a user.
///
/// Reads the code and the user's entitlement, extends the access window and
/// marks the code used, all inside one IMMEDIATE transaction. SQLite hands the
/// write lock to one transaction at a time, so a concurrent redemption of the
/// same single-use code waits for the winner to commit (see the connection busy
/// timeout) and then reads `used_at` already set.
///
/// `code` must already be normalized. Any rejection drops the transaction
/// without writing anything.
pub fn redeem_promo_code_atomic(
    conn: &mut Connection,
    user_id: &str,
    code: &str,
    now: i64,
) -> Result<Redemption> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let promo = get_promo_code(&tx, code)?
        .ok_or_else(|| AppError::NotFound("El código no existe.".into()))?;

    let plan = promo.check_redeemable(now)?;

    let prior_access_until = get_user_entitlement(&tx, user_id)?.and_then(|e| e.access_until);
    let access_until = extend_access_until(now, prior_access_until, plan.days);

    let levels: Vec<String> = plan.levels.iter().map(|l| l.to_string()).collect();
    let levels_json = serde_json::to_string(&levels)
        .map_err(|e| AppError::Internal(format!("Failed to encode levels: {}", e)))?;

    // Merge: only entitlement columns are touched on an existing user
    tx.execute(
        "INSERT INTO users (id, plan, levels, access, blocked, access_until, updated_at, created_at)
         VALUES (?1, ?2, ?3, 1, 0, ?4, ?5, ?5)
         ON CONFLICT(id) DO UPDATE SET
            plan = excluded.plan,
            levels = excluded.levels,
            access = 1,
            blocked = 0,
            access_until = excluded.access_until,
            updated_at = excluded.updated_at",
        params![user_id, plan.plan, &levels_json, access_until, now],
    )?;

    // Recorded for multi-use codes too; the last redeemer wins
    tx.execute(
        "UPDATE promo_codes SET used_at = ?1, used_by = ?2 WHERE code = ?3",
        params![now, user_id, code],
    )?;

    tx.commit()?;

    Ok(Redemption {
        plan: plan.plan.to_string(),
        levels,
        access_until,
    })
}
