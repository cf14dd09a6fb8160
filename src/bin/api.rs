use landmark_bot::{
    api::{start_server, ApiState},
    catalog::Catalog,
    config::BotConfig,
    dialogue::Dialogue,
    state::InMemorySessionStore,
    verification::HttpVerifier,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env()?;

    info!("🚀 Landmark Bot - Webhook Server");
    info!("📍 Port: {}", config.port);
    info!("🔎 Verification service: {}", config.verify_url);

    // Create components
    let catalog = Arc::new(Catalog::landmarks()?);
    let sessions = Arc::new(InMemorySessionStore::new());
    let verifier = Arc::new(HttpVerifier::new(
        config.verify_url.clone(),
        config.verify_timeout,
    )?);

    let dialogue = Arc::new(
        Dialogue::new(catalog, sessions, verifier).with_bot_name(config.bot_name.as_deref()),
    );

    info!(
        landmarks = dialogue.catalog().entries().len(),
        "✅ Dialogue initialized"
    );

    let state = ApiState::new(dialogue, config.bot_token.as_deref());
    start_server(state, config.port).await?;

    Ok(())
}
