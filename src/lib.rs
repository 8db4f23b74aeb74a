pub mod config;
pub mod db;
pub mod error;

pub use config::{Config, DbConfig};
pub use db::{CredentialStore, UserCredential};
pub use error::StoreError;
