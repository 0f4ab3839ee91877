//! Row mapping for the tables in this crate.
//!
//! Each `*_COLS` constant lists columns in the order the matching
//! `FromRow` impl reads them.

use rusqlite::{Connection, OptionalExtension, Params, Row, types::Type};

use crate::error::Result;
use crate::models::{PromoCode, UserEntitlement};

pub const PROMO_CODE_COLS: &str =
    "code, active, single_use, expires_at, plan, used_at, used_by, created_at";

pub const USER_ENTITLEMENT_COLS: &str =
    "id, plan, levels, access, blocked, access_until, updated_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl FromRow for PromoCode {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(PromoCode {
            code: row.get(0)?,
            active: row.get(1)?,
            single_use: row.get(2)?,
            expires_at: row.get(3)?,
            plan: row.get(4)?,
            used_at: row.get(5)?,
            used_by: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for UserEntitlement {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let levels_json: String = row.get(2)?;
        let levels = serde_json::from_str(&levels_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        Ok(UserEntitlement {
            user_id: row.get(0)?,
            plan: row.get(1)?,
            levels,
            access: row.get(3)?,
            blocked: row.get(4)?,
            access_until: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

pub fn query_one<T: FromRow>(conn: &Connection, sql: &str, params: impl Params) -> Result<Option<T>> {
    let item = conn.query_row(sql, params, T::from_row).optional()?;
    Ok(item)
}

pub fn query_all<T: FromRow>(conn: &Connection, sql: &str, params: impl Params) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let items = stmt
        .query_map(params, T::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}
