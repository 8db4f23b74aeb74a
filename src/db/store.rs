use crate::config::DbConfig;
use crate::db::models::UserCredential;
use crate::db::schema::USER_TABLE_INIT;
use crate::error::StoreError;
use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Connection, Row};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Credential store over a single shared connection pool.
///
/// Built with [`CredentialStore::new`], made ready with [`connect`](Self::connect)
/// and torn down with [`disconnect`](Self::disconnect). Data operations fail
/// with [`StoreError::NotConnected`] outside that window.
pub struct CredentialStore {
    pool: AnyPool,
    connected: AtomicBool,
    pool_size: NonZeroU32,
}

impl CredentialStore {
    /// Create the pool without opening any connection.
    pub fn new(config: &DbConfig) -> Result<Self, StoreError> {
        // Install database drivers for the "any" pool
        sqlx::any::install_default_drivers();

        let url = config.database_url()?;
        check_driver(&url)?;

        let pool = AnyPoolOptions::new()
            .max_connections(config.pool_size.get())
            .connect_lazy(&url)?;

        Ok(Self {
            pool,
            connected: AtomicBool::new(false),
            pool_size: config.pool_size,
        })
    }

    /// True once `disconnect` has closed the pool.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire) && !self.pool.is_closed()
    }

    /// Check that the database answers, then mark the store ready.
    ///
    /// Safe to call again while connected. A store that has been
    /// disconnected cannot be revived.
    pub async fn connect(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::NotConnected);
        }

        let mut conn = self.pool.acquire().await.inspect_err(|e| {
            warn!(error = %e, "could not acquire database connection");
        })?;
        conn.ping().await.inspect_err(|e| {
            warn!(error = %e, "database ping failed");
        })?;

        if !self.connected.swap(true, Ordering::AcqRel) {
            info!(pool_size = self.pool_size.get(), "connected to database");
        }
        Ok(())
    }

    /// Close every pooled connection. Only the first call after a successful
    /// `connect` succeeds.
    pub async fn disconnect(&self) -> Result<(), StoreError> {
        if !self.connected.swap(false, Ordering::AcqRel) || self.pool.is_closed() {
            warn!("disconnect requested but store is not connected");
            return Err(StoreError::NotConnected);
        }

        self.pool.close().await;
        info!("successfully ended database connection");
        Ok(())
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        self.ensure_connected()?;
        // one statement per query; sqlx::query doesn't run multi-statement strings
        for stmt in USER_TABLE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new credential row. A duplicate id is a driver error and
    /// leaves the existing row untouched.
    pub async fn add_user(&self, user_id: &str, access_token: &str) -> Result<(), StoreError> {
        self.ensure_connected()?;

        sqlx::query("INSERT INTO `user` (`id`, `access_token`) VALUES (?, ?)")
            .bind(user_id)
            .bind(access_token)
            .execute(&self.pool)
            .await
            .inspect_err(|e| warn!(user_id, error = %e, "unable to add user"))?;

        debug!(user_id, "user added");
        Ok(())
    }

    /// Look up the user id owning `access_token`.
    ///
    /// `Ok(None)` means no row matched. If several rows share the token, the
    /// first one the database returns wins.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<String>, StoreError> {
        self.ensure_connected()?;

        let row = sqlx::query("SELECT `id` FROM `user` WHERE `access_token` = ?")
            .bind(access_token)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|e| warn!(error = %e, "unable to find user by access token"))?;

        match row {
            Some(row) => Ok(Some(row.try_get("id")?)),
            None => {
                debug!("no user matches access token");
                Ok(None)
            }
        }
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserCredential>, StoreError> {
        self.ensure_connected()?;

        let cred = sqlx::query_as::<_, UserCredential>(
            "SELECT `id`, `access_token` FROM `user` WHERE `id` = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| warn!(user_id, error = %e, "unable to load user"))?;
        Ok(cred)
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

/// Reject URL schemes no installed driver handles.
///
/// `connect_lazy` only looks the driver up on first use, too late for `new`.
fn check_driver(url: &str) -> Result<(), StoreError> {
    let scheme = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or_default();
    match scheme {
        "mysql" | "mariadb" | "sqlite" => Ok(()),
        _ => Err(sqlx::Error::Configuration(
            format!("no driver found for URL scheme {scheme:?}").into(),
        )
        .into()),
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("pool_size", &self.pool_size)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
