//! SQLite storage implementation for the trading results API.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `spimex-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!   core (domain)        server (HTTP)
//!        │                    │
//!        └─────────┬──────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod trading;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from spimex-core for convenience
pub use spimex_core::errors::{DatabaseError, Error, Result};
