pub mod modules;
pub mod shared;

pub use modules::auth;
pub use modules::booking;
pub use modules::content;
pub use modules::remote;
pub use modules::storage;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::adapter::outgoing::identity_rest::IdentityRestGateway;
use crate::auth::application::session::SessionTracker;
use crate::content::adapter::outgoing::css_variables::CssVariableSink;
use crate::content::application::store::ContentStore;
use crate::remote::adapter::outgoing::firestore_rest::FirestoreRestStore;
use crate::shared::config::AppConfig;
use crate::shared::credentials::IdTokenStore;
use crate::shared::notify::Notifier;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting content mirror...");

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let tokens = Arc::new(IdTokenStore::new());
    let remote = Arc::new(FirestoreRestStore::new(
        config.project_id.clone(),
        config.api_key.clone(),
        tokens.clone(),
        config.poll_interval,
    ));
    let theme_sink = Arc::new(CssVariableSink::new());

    let (notifier, mut toasts) = Notifier::channel();
    tokio::spawn(async move {
        while let Some(toast) = toasts.recv().await {
            tracing::warn!(level = ?toast.level, "{}", toast.message);
        }
    });

    let store = Arc::new(ContentStore::new(remote, theme_sink, notifier));
    store.start().await;
    info!(project = %config.project_id, "content mirror running");

    let auth_gateway =
        IdentityRestGateway::new(reqwest::Client::new(), config.api_key.clone(), tokens);
    let session = SessionTracker::start(&auth_gateway).await;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    session.shutdown();
    store.shutdown();
    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
