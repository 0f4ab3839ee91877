mod from_row;
pub mod queries;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::Result;
use crate::jwt::CallerTokenKey;

pub type DbPool = Pool<SqliteConnectionManager>;

/// How long a writer waits for a competing transaction before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub caller_keys: CallerTokenKey,
    pub dev_mode: bool,
}

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(configure_connection);
    let pool = Pool::builder().max_size(10).build(manager)?;
    Ok(pool)
}

/// Single-connection in-memory pool. Every in-memory connection is its own
/// database, so the pool must never open a second one.
pub fn create_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(configure_connection);
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)?;
    Ok(pool)
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS promo_codes (
            code TEXT PRIMARY KEY,
            active INTEGER NOT NULL DEFAULT 1,
            single_use INTEGER NOT NULL DEFAULT 0,
            expires_at INTEGER,
            plan TEXT NOT NULL,
            used_at INTEGER,
            used_by TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            plan TEXT,
            levels TEXT NOT NULL DEFAULT '[]',
            access INTEGER NOT NULL DEFAULT 0,
            blocked INTEGER NOT NULL DEFAULT 0,
            access_until INTEGER,
            updated_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );",
    )?;
    Ok(())
}
