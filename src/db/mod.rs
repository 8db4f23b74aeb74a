//! Database module: the credential store, its row model and schema.
//!
//! Layout:
//! - `models.rs`: Rust struct mirroring a `user` row
//! - `schema.rs`: SQL DDL for the `user` table (portable across MySQL and SQLite)
//! - `store.rs`: pool ownership, lifecycle and queries

pub mod models;
pub mod schema;
pub mod store;

pub use models::UserCredential;
pub use schema::USER_TABLE_INIT;
pub use store::CredentialStore;
