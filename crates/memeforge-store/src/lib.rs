//! # memeforge-store
//!
//! Record storage for memeforge: domain models, the [`Storage`] capability
//! trait, an in-memory backend used by the simulated deployment flow, and a
//! SQLite backend for installs that want records to survive restarts.

pub mod memory;
pub mod migrations;
pub mod models;
pub mod sqlite;
pub mod store;

mod error;

pub use error::StoreError;
pub use memory::MemStorage;
pub use models::*;
pub use sqlite::SqliteStorage;
pub use store::Storage;
