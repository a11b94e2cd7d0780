use std::{sync::Arc, time::Duration};

use steam_quest_api::{
    api::{create_router, AppState},
    config::Config,
    services::{CredentialProvider, EnvCredentials, GeminiModel, Recommender},
    session::SessionStore,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let model = GeminiModel::new(&config.gemini_api_url, &config.gemini_model);
    tracing::info!(
        model = %model.model_id(),
        timeout_secs = config.request_timeout_secs,
        "Using Gemini for recommendations"
    );

    let credentials = EnvCredentials;
    if credentials.api_key().is_none() {
        tracing::warn!(
            var = credentials.source_name(),
            "API key not set; recommendation requests will fail until it is"
        );
    }

    let recommender = Recommender::new(
        Arc::new(model),
        Arc::new(credentials),
        config.request_timeout(),
    );

    let sessions = SessionStore::with_ttl(config.session_ttl());
    sessions.spawn_expiry_sweeper(SESSION_SWEEP_INTERVAL);
    tracing::info!(ttl_secs = config.session_ttl_secs, "Idle sessions expire");

    let app = create_router(AppState::with_sessions(sessions, recommender));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
