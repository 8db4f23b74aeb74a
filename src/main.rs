use credential_store::{Config, CredentialStore};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Self-demo: one round trip through every store operation.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(db = ?cfg.db, loglevel = %cfg.loglevel);

    let store = CredentialStore::new(&cfg.db)?;

    if let Err(e) = store.connect().await {
        warn!(error = %e, "connect failed");
        return Ok(());
    }

    if let Err(e) = store.init_schema().await {
        warn!(error = %e, "schema init failed");
    }

    match store.add_user("user1", "token1").await {
        Ok(()) => info!("User added"),
        Err(e) => warn!(error = %e, "add_user failed"),
    }

    match store.get_user("token1").await {
        Ok(Some(id)) => info!(user_id = %id, "found user"),
        Ok(None) => info!("no user for token"),
        Err(e) => warn!(error = %e, "get_user failed"),
    }

    if let Err(e) = store.disconnect().await {
        warn!(error = %e, "disconnect failed");
    }

    Ok(())
}
