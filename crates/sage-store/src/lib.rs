//! # sage-store
//!
//! SQLite persistence for the Sage conversation core.
//!
//! The store is an opaque keyed map: conversations are persisted whole as
//! JSON blobs keyed by id, daily usage as one integer row per date. Callers
//! in `sage-context` write through on every mutation and treat any error
//! here as a signal to degrade to in-memory operation; nothing in this
//! crate is retried.

#![deny(unsafe_code)]

pub mod conversations;
pub mod database;
pub mod error;
pub mod schema;
pub mod usage;

pub use conversations::ConversationRepo;
pub use database::Database;
pub use error::StoreError;
pub use usage::UsageRepo;
