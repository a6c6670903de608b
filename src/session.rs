//! Sessions: scoped units of work against the store.
//!
//! A session owns one connection. Reads run in autocommit mode and hold no
//! lock between calls. The first write opens a transaction that stays open
//! until [`Session::commit`] or [`Session::rollback`]; closing or dropping the
//! session discards anything uncommitted. Records handed out
//! are plain values, so they remain readable after a commit but are not kept
//! in sync with the store. Use [`Session::refresh`] to reload one.

use crate::error::{Result, StoreError};
use crate::mapping::{self, Insert, Record};
use crate::models::Task;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use std::sync::{Arc, Mutex};
use tracing::debug;

struct SessionState {
    conn: Connection,
}

impl SessionState {
    // SQLite can end a transaction on its own (IOERR, FULL, NOMEM), so the
    // connection's autocommit state is the only source of truth.
    fn begin_if_needed(&mut self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn end(&mut self, statement: &str) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch(statement)?;
        }
        Ok(())
    }

    fn fetch_one<R: Record>(&self, id: i64) -> Result<Option<R>> {
        self.conn
            .query_row(&mapping::select_by_id::<R>(), [id], R::from_row)
            .optional()
            .map_err(|e| e.into())
    }

    fn fetch_many<R: Record>(&self, sql: &str, params: &[Value]) -> Result<Vec<R>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params), R::from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }
}

/// Async handle for one unit of work. Obtain one with
/// [`Engine::session`](crate::Engine::session).
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub(crate) fn new(conn: Connection) -> Self {
        debug!("session opened");
        Session {
            state: Arc::new(Mutex::new(SessionState { conn })),
        }
    }

    /// Run blocking work against this session's connection off the async
    /// executor.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SessionState) -> Result<T> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let mut state = state.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut *state)
        })
        .await?
    }

    // ==================== Reads ====================

    pub async fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        self.run(move |state| state.fetch_one::<R>(id)).await
    }

    /// Every row of `R`'s table, ordered by primary key.
    pub async fn all<R: Record>(&self) -> Result<Vec<R>> {
        self.run(|state| state.fetch_many::<R>(&mapping::select_all::<R>(), &[]))
            .await
    }

    /// Rows of `R` whose `column` equals `value`, ordered by primary key.
    pub async fn find_by<R: Record>(
        &self,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<R>> {
        if !R::COLUMNS.contains(&column) {
            return Err(StoreError::UnknownColumn {
                table: R::TABLE,
                column: column.to_string(),
            });
        }
        let sql = mapping::select_where::<R>(column);
        let value = value.into();
        self.run(move |state| state.fetch_many::<R>(&sql, &[value]))
            .await
    }

    /// Tasks owned by `user_id`.
    pub async fn tasks_of(&self, user_id: i64) -> Result<Vec<Task>> {
        self.find_by::<Task>("user", user_id).await
    }

    /// Reload `record` from the store.
    pub async fn refresh<R: Record>(&self, record: &R) -> Result<R> {
        let id = record.id();
        self.get::<R>(id).await?.ok_or(StoreError::RecordNotFound {
            table: R::TABLE,
            id,
        })
    }

    // ==================== Writes ====================

    /// Insert a row and return it as stored, with its assigned id and
    /// defaults filled in.
    pub async fn add<I: Insert>(&self, new: I) -> Result<I::Record> {
        self.run(move |state| {
            state.begin_if_needed()?;
            let record = state.conn.query_row(
                &mapping::insert::<I::Record>(),
                params_from_iter(new.values()),
                I::Record::from_row,
            )?;
            debug!(table = I::Record::TABLE, id = record.id(), "inserted");
            Ok(record)
        })
        .await
    }

    /// Write every non-key column of `record`.
    pub async fn update<R: Record>(&self, record: &R) -> Result<()> {
        let id = record.id();
        let mut values = record.values();
        values.push(id.into());
        self.run(move |state| {
            state.begin_if_needed()?;
            let changed = state
                .conn
                .execute(&mapping::update::<R>(), params_from_iter(values))?;
            if changed == 0 {
                return Err(StoreError::RecordNotFound { table: R::TABLE, id });
            }
            Ok(())
        })
        .await
    }

    /// Delete the row with `id`. Returns whether a row was removed; rows
    /// referencing it through a cascading foreign key go with it.
    pub async fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        self.run(move |state| {
            state.begin_if_needed()?;
            let changed = state.conn.execute(&mapping::delete::<R>(), [id])?;
            debug!(table = R::TABLE, id, deleted = changed > 0, "delete");
            Ok(changed > 0)
        })
        .await
    }

    // ==================== Transaction Control ====================

    pub async fn commit(&self) -> Result<()> {
        self.run(|state| state.end("COMMIT")).await?;
        debug!("session committed");
        Ok(())
    }

    pub async fn rollback(&self) -> Result<()> {
        self.run(|state| state.end("ROLLBACK")).await?;
        debug!("session rolled back");
        Ok(())
    }

    /// Discard uncommitted work and release the connection.
    pub async fn close(self) -> Result<()> {
        self.rollback().await?;
        debug!("session closed");
        Ok(())
    }
}
