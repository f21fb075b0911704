use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use prconnect_api::auth::ensure_admin;
use prconnect_api::dispatch::{AgentClient, GenerationDispatcher, required_agent_timeout};
use prconnect_api::routes::{build_router, cors_layer};
use prconnect_api::{AppState, AppStateInner, ServerConfig};
use prconnect_content::{ContentConfig, ContentGenerator, Orchestrator, OutletRegistry, Strategy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prconnect=debug,prconnect_api=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e:#}");
            eprintln!("       Set PRCONNECT_JWT_SECRET (and friends) in your .env file and restart.");
            std::process::exit(1);
        }
    };
    let content = ContentConfig::from_env()?;

    // Init database
    let db = prconnect_db::Database::open(&config.db_path)?;
    if let Some(seed) = &config.admin {
        ensure_admin(&db, seed)?;
    }

    // Generation: remote agent when configured, in-process otherwise
    let agent_budget = required_agent_timeout(content.provider.timeout);
    let agent_timeout = config.agent_timeout.unwrap_or(agent_budget);
    if content.strategy == Strategy::Delegated && agent_timeout < agent_budget {
        anyhow::bail!(
            "PRCONNECT_AGENT_TIMEOUT_SECS ({}s) is shorter than a full brief can take ({}s)",
            agent_timeout.as_secs(),
            agent_budget.as_secs()
        );
    }
    let generator = ContentGenerator::new(content, OutletRegistry::builtin())?;
    let agent = match &config.agent_url {
        Some(url) => {
            info!("Forwarding generation to agent at {} (timeout {:?})", url, agent_timeout);
            Some(AgentClient::with_timeout(url.clone(), agent_timeout)?)
        }
        None => {
            warn!("PRCONNECT_AGENT_URL not set, generating in process");
            None
        }
    };
    let dispatcher = GenerationDispatcher::new(Orchestrator::new(generator), agent);

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: config.jwt_secret.clone(),
        token_ttl: chrono::Duration::hours(config.token_ttl_hours),
        dispatcher,
    });

    let app = build_router(state, cors_layer(config.cors_origins.as_deref()));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("PR-Connect API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), waiting for Ctrl+C", e);
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
