mod config;
mod db;
mod dream;
mod email;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::dream::store::PgAssessmentStore;
use crate::dream::strategy::LlmStrategyGenerator;
use crate::email::{DisabledMailer, Mailer, ResendMailer};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DREAM API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgAssessmentStore::new(db));

    // Initialize strategy generator (503 on every request when the key is missing)
    let llm = match config.anthropic_api_key.clone() {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(LlmClient::new(key)?)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; strategy generation disabled");
            None
        }
    };
    let strategist = Arc::new(LlmStrategyGenerator::new(llm));

    // Initialize mailer
    let mailer: Arc<dyn Mailer> = match config.resend_api_key.clone() {
        Some(key) => {
            info!("Email delivery via Resend (from: {})", config.email_from);
            Arc::new(ResendMailer::new(key, config.email_from.clone())?)
        }
        None => {
            warn!("RESEND_API_KEY not set; report emails disabled");
            Arc::new(DisabledMailer)
        }
    };

    // Build app state
    let state = AppState {
        store,
        strategist,
        mailer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to SITE_URL once the marketing site is on its final domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
