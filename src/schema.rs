//! Database schema.

use crate::error::Result;
use rusqlite::Connection;
use tracing::{debug, info};

pub const USERS_TABLE: &str = "users";
pub const TASKS_TABLE: &str = "tasks";

/// Longest task title the store accepts, in characters.
pub const TITLE_MAX_LEN: usize = 128;

// SQLite ignores the VARCHAR length, so the CHECK enforces it. length()
// stops at the first NUL, so NUL is rejected outright.
const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL,
    tg_id BIGINT,
    PRIMARY KEY (id)
)";

const CREATE_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER NOT NULL,
    title VARCHAR(128) NOT NULL CHECK (length(title) <= 128 AND instr(CAST(title AS BLOB), x'00') = 0),
    completed BOOLEAN NOT NULL DEFAULT 0,
    \"user\" INTEGER NOT NULL,
    PRIMARY KEY (id),
    FOREIGN KEY (\"user\") REFERENCES users (id) ON DELETE CASCADE
)";

/// Tables in dependency order: parents before children.
const TABLES: &[(&str, &str)] = &[(USERS_TABLE, CREATE_USERS), (TASKS_TABLE, CREATE_TASKS)];

/// Create every missing table. Existing tables and their rows are left alone.
pub fn create_all(conn: &Connection) -> Result<()> {
    for (name, ddl) in TABLES {
        if table_exists(conn, name)? {
            debug!(table = name, "table already exists");
            continue;
        }
        conn.execute(ddl, [])?;
        info!(table = name, "created table");
    }
    Ok(())
}

/// Drop every table, children first.
pub fn drop_all(conn: &Connection) -> Result<()> {
    for (name, _) in TABLES.iter().rev() {
        if table_exists(conn, name)? {
            conn.execute(&format!("DROP TABLE \"{name}\""), [])?;
            info!(table = name, "dropped table");
        }
    }
    Ok(())
}

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Names of all user tables, sorted.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| e.into())
}
