//! # smashpass
//!
//! A casual "smash or pass" voting service over a fixed catalog of 151
//! creatures. Visitors pick a display name (no password), get shown creatures
//! one at a time, vote, and browse global and per-user statistics.
//!
//! The crate is built on [axum](https://crates.io/crates/axum) for HTTP,
//! [Sea-ORM](https://crates.io/crates/sea-orm) for the relational store and
//! [`tower-sessions`](https://crates.io/crates/tower-sessions) for the
//! session-bound identity, whose records are kept in the same database by
//! [`DbSessionStore`].
//!
//! ## Components
//!
//! - [`catalog`]: creature records and the catalog import
//! - [`recorder`]: writes votes, one per (username, creature)
//! - [`tally`]: keeps the cached smash/pass counters equal to the vote log
//! - [`selector`]: sequential and random "next creature" policies
//! - [`stats`]: the global gallery and per-user breakdowns
//! - [`identity`]: the [`CurrentUser`](identity::CurrentUser) extractor
//!
//! ## Quick Start
//!
//! ```no_run
//! use sea_orm::Database;
//! use sea_orm_migration::MigratorTrait;
//! use smashpass::{migration::Migrator, routes, AppState, Config, DbSessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let db = Database::connect(&config.database_url).await?;
//! Migrator::up(&db, None).await?;
//!
//! let sessions = routes::session_layer(
//!     DbSessionStore::new(db.clone()),
//!     config.session_secure,
//!     config.session_inactivity_hours,
//! );
//! let app = routes::build_router(AppState::new(db, &config), sessions);
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod migration;
pub mod recorder;
pub mod routes;
pub mod selector;
mod session_store;
pub mod state;
pub mod stats;
pub mod tally;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;

/// The Sea-ORM backed `tower-sessions` store holding login identities.
pub use session_store::DbSessionStore;

/// Re-exported so callers can purge expired sessions without depending on
/// `tower-sessions` directly.
pub use tower_sessions::ExpiredDeletion;
