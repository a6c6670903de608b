//! The storage engine handle.
//!
//! An [`Engine`] is created once by the host application and passed to
//! whatever needs the database. It is cheap to clone: clones share the same
//! configuration. Every session and every [`Engine::begin`] block gets its own
//! SQLite connection, so the engine itself holds no connection state.

use crate::config::DbConfig;
use crate::error::Result;
use crate::schema;
use crate::session::Session;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
struct EngineInner {
    path: PathBuf,
    echo: bool,
}

/// Handle to one file-backed SQLite database.
#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Build an engine for `config`. Nothing is opened until first use.
    pub fn new(config: DbConfig) -> Result<Self> {
        let path = config.database_path()?;
        debug!(path = %path.display(), echo = config.echo, "configured engine");
        Ok(Engine {
            inner: Arc::new(EngineInner {
                path,
                echo: config.echo,
            }),
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Create the schema's tables if they do not exist yet.
    pub async fn init_db(&self) -> Result<()> {
        self.begin(schema::create_all).await?;
        info!(path = %self.path().display(), "database initialized");
        Ok(())
    }

    /// Drop every table of the schema, with all of its rows.
    pub async fn drop_db(&self) -> Result<()> {
        self.begin(schema::drop_all).await
    }

    pub async fn table_names(&self) -> Result<Vec<String>> {
        self.begin(schema::table_names).await
    }

    /// Open a new session on its own connection.
    pub async fn session(&self) -> Result<Session> {
        let engine = self.clone();
        let conn = tokio::task::spawn_blocking(move || engine.connect()).await??;
        Ok(Session::new(conn))
    }

    /// Run `f` in a transaction on a fresh connection, committing if it
    /// returns `Ok`. An `Err` rolls the transaction back.
    pub async fn begin<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = engine.connect()?;
            let tx = conn.transaction()?;
            let value = f(&*tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await?
    }

    /// Blocking: open and configure a connection.
    pub(crate) fn connect(&self) -> Result<Connection> {
        let mut conn = Connection::open(&self.inner.path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        // Readers and the single writer must not block each other.
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "connection opened");
        if self.inner.echo {
            conn.trace(Some(echo_statement));
        }
        Ok(conn)
    }
}

fn echo_statement(sql: &str) {
    info!(target: "taskbot::sql", "{sql}");
}

/// Create the schema of `engine`'s database if it is missing.
pub async fn init_db(engine: &Engine) -> Result<()> {
    engine.init_db().await
}
