use anyhow::{Context, Result};
use bco_skill::api::{create_router, ApiState};
use bco_skill::backend::GraphQlClient;
use bco_skill::config::SkillConfig;
use bco_skill::i18n::{CatalogStore, Locale};
use bco_skill::skill::Skill;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bco_skill=info".into()),
        )
        .init();

    info!("BCO skill starting...");

    let config = SkillConfig::from_env().context("Failed to load configuration")?;
    info!(
        endpoint = %config.backend.endpoint,
        port = config.server.port,
        auth = config.server.auth_token.is_some(),
        default_locale = %config.i18n.default_locale,
        locales_dir = %config.i18n.locales_dir,
        "Configuration loaded"
    );

    let default_locale = Locale::parse(&config.i18n.default_locale)
        .with_context(|| format!("Invalid default locale '{}'", config.i18n.default_locale))?;

    // Built-in English plus whatever the locales directory provides
    let mut catalogs = CatalogStore::new();
    let loaded = catalogs
        .load_dir(Path::new(&config.i18n.locales_dir))
        .context("Failed to load translation catalogs")?;
    info!(loaded = loaded, languages = ?catalogs.languages(), "Catalogs ready");

    let backend = GraphQlClient::with_timeout(config.backend.endpoint.clone(), config.backend.timeout())
        .context("Failed to initialize GraphQL client")?;
    info!(endpoint = %backend.endpoint(), "GraphQL client ready");

    let skill = Skill::new(Arc::new(backend), Arc::new(catalogs), default_locale);
    let intents: Vec<&str> = skill.handlers().iter().map(|h| h.intent_name()).collect();
    info!(intents = ?intents, "Intent handlers registered");
    let router = create_router(ApiState {
        skill: Arc::new(skill),
        auth_token: config.server.auth_token.clone(),
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port))
        .await
        .context("Failed to bind skill API port")?;
    info!(port = config.server.port, "Skill API listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Skill API server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    info!("BCO skill stopped");

    Ok(())
}
