//! # taskbot - persistence for a task-tracking bot
//!
//! Two tables in a SQLite file: `users`, and `tasks` owned by them with a
//! cascading foreign key. The host builds one [`Engine`], calls [`init_db`]
//! at startup, and opens a [`Session`] per unit of work:
//!
//! ```no_run
//! use taskbot::{DbConfig, Engine, NewTask, NewUser};
//!
//! # async fn demo() -> taskbot::Result<()> {
//! let engine = Engine::new(DbConfig::default())?;
//! taskbot::init_db(&engine).await?;
//!
//! let session = engine.session().await?;
//! let user = session.add(NewUser::new(12345)).await?;
//! session.add(NewTask::new("Buy milk", user.id)).await?;
//! session.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod models;
pub mod schema;
pub mod session;

pub use config::{DEFAULT_URL, DbConfig};
pub use engine::{Engine, init_db};
pub use error::{Result, StoreError};
pub use mapping::{Insert, Record};
pub use models::*;
pub use session::Session;
