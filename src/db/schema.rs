//! SQL DDL for the credential table.
//! Backtick-quoted identifiers parse on both MySQL and SQLite.

/// `user` table with:
/// - `id` primary key, opaque user identifier
/// - `access_token` opaque bearer token, the lookup key
pub const USER_TABLE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS `user` (
    `id` VARCHAR(255) NOT NULL PRIMARY KEY,
    `access_token` VARCHAR(255) NOT NULL
);
"#;
