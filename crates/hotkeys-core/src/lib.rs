//! Catalog data layer between `hotkeys-api` and the CLI.
//!
//! - **[`Catalog`]**: Facade composing the repository, favorites tracker
//!   and admin service over one [`CatalogBackend`]. Tracks the signed-in
//!   [`Identity`] and owns the optional background refresh task.
//!
//! - **[`CatalogRepository`]**: Loads categories and programs into the
//!   [`CatalogStore`], fetches shortcuts per program on demand, and serves
//!   joined [`ProgramEntry`] views.
//!
//! - **[`CatalogStore`]**: Snapshot storage on `tokio::sync::watch`
//!   channels. Readers never observe a half-applied load.
//!
//! - **[`FavoritesTracker`]**: Optimistic per-user favorite toggles with
//!   rollback on failed writes.
//!
//! - **[`Command`]**: Admin mutations executed by [`AdminService`]; deletes
//!   cascade leaf-first.
//!
//! - **Backends**: [`RestBackend`] talks to the hosted store;
//!   [`MemoryBackend`] holds a [`CatalogSeed`] in process.

pub mod backend;
pub mod catalog;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod model;
pub mod repository;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{CatalogBackend, CatalogSeed, MemoryBackend, RestBackend};
pub use catalog::Catalog;
pub use command::requests::*;
pub use command::{AdminService, CascadeSummary, Command, CommandResult};
pub use config::{CatalogConfig, TlsVerification};
pub use error::{ConflictKind, CoreError};
pub use favorites::FavoritesTracker;
pub use filter::{ProgramQuery, filter_programs, filter_shortcuts, popular_programs};
pub use repository::CatalogRepository;
pub use store::{CatalogStore, LoadState, Snapshot};
pub use stream::{EntityStream, EntityWatchStream};

pub use model::{
    Category, DEFAULT_CATEGORY_COLOR, Entity, EntityId, EntityKind, Favorite, Identity, Program,
    ProgramEntry, Shortcut, Slug,
};
