// hotkeys-api: Async Rust client for the catalog's PostgREST-style store

pub mod catalog;
pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use client::RestClient;
pub use error::Error;
pub use models::{
    CategoryPayload, CategoryRecord, FavoritePayload, FavoriteRecord, ProfileRecord,
    ProgramPayload, ProgramRecord, ShortcutPayload, ShortcutRecord,
};
pub use query::{Order, Query};
pub use transport::{TlsMode, TransportConfig};
