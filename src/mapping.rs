//! Record-to-row mapping.
//!
//! Each table has an explicit struct implementing [`Record`], and each
//! insertable shape implements [`Insert`]. Sessions build all of their SQL
//! from these constants, so there is no per-table query code.

use crate::models::{NewTask, NewUser, Task, User};
use crate::schema::{TASKS_TABLE, USERS_TABLE};
use rusqlite::Row;
use rusqlite::types::Value;

/// A stored row with an integer primary key.
pub trait Record: Sized + Send + 'static {
    const TABLE: &'static str;
    /// Column names in select order. The first one is the primary key.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    /// Values of every non-key column, in `COLUMNS` order.
    fn values(&self) -> Vec<Value>;
}

/// Input for a new row of `Self::Record`. The primary key is assigned by
/// the store.
pub trait Insert: Send + 'static {
    type Record: Record;

    /// Values of every non-key column, in `Record::COLUMNS` order.
    fn values(&self) -> Vec<Value>;
}

impl Record for User {
    const TABLE: &'static str = USERS_TABLE;
    const COLUMNS: &'static [&'static str] = &["id", "tg_id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            tg_id: row.get(1)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![self.tg_id.into()]
    }
}

impl Insert for NewUser {
    type Record = User;

    fn values(&self) -> Vec<Value> {
        vec![self.tg_id.into()]
    }
}

impl Record for Task {
    const TABLE: &'static str = TASKS_TABLE;
    const COLUMNS: &'static [&'static str] = &["id", "title", "completed", "user"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            completed: row.get(2)?,
            user: row.get(3)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.completed.into(),
            self.user.into(),
        ]
    }
}

impl Insert for NewTask {
    type Record = Task;

    fn values(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.completed.into(),
            self.user.into(),
        ]
    }
}

// ==================== Statement Builders ====================

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn column_list<R: Record>(columns: &[&str]) -> String {
    debug_assert!(columns.iter().all(|c| R::COLUMNS.contains(c)));
    columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
}

fn non_key_columns<R: Record>() -> &'static [&'static str] {
    &R::COLUMNS[1..]
}

pub(crate) fn select_all<R: Record>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list::<R>(R::COLUMNS),
        quote(R::TABLE),
        quote(R::COLUMNS[0])
    )
}

pub(crate) fn select_by_id<R: Record>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        column_list::<R>(R::COLUMNS),
        quote(R::TABLE),
        quote(R::COLUMNS[0])
    )
}

/// Caller must check that `column` is one of `R::COLUMNS`.
pub(crate) fn select_where<R: Record>(column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {}",
        column_list::<R>(R::COLUMNS),
        quote(R::TABLE),
        quote(column),
        quote(R::COLUMNS[0])
    )
}

pub(crate) fn insert<R: Record>() -> String {
    let columns = non_key_columns::<R>();
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quote(R::TABLE),
        column_list::<R>(columns),
        placeholders,
        column_list::<R>(R::COLUMNS)
    )
}

/// The primary key binds to the last placeholder.
pub(crate) fn update<R: Record>() -> String {
    let columns = non_key_columns::<R>();
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", quote(c), i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        quote(R::TABLE),
        assignments,
        quote(R::COLUMNS[0]),
        columns.len() + 1
    )
}

pub(crate) fn delete<R: Record>() -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?1",
        quote(R::TABLE),
        quote(R::COLUMNS[0])
    )
}
