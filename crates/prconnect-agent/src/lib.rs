//! Content agent: a small HTTP service that turns briefs into per-outlet
//! press releases for the API service.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use prconnect_content::{ContentConfig, Orchestrator, Strategy};
use prconnect_types::messages::PressReleaseRequest;

/// Settings for the agent process.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    pub content: ContentConfig,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let port = match get("PRCONNECT_AGENT_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PRCONNECT_AGENT_PORT: invalid value '{raw}'"))?,
            None => 8001,
        };
        Ok(Self {
            host: get("PRCONNECT_AGENT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            content: ContentConfig::from_lookup(&lookup)?,
        })
    }
}

#[derive(Clone)]
pub struct AgentState {
    orchestrator: Arc<Orchestrator>,
    strategy: Strategy,
}

impl AgentState {
    pub fn new(orchestrator: Orchestrator, strategy: Strategy) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            strategy,
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
    strategy: &'static str,
    outlets: Vec<String>,
    timestamp: String,
}

async fn health(State(state): State<AgentState>) -> impl IntoResponse {
    Json(Health {
        status: "healthy",
        service: "PR-Connect content agent",
        strategy: match state.strategy {
            Strategy::Template => "template",
            Strategy::Delegated => "delegated",
        },
        outlets: state
            .orchestrator
            .generator()
            .registry()
            .iter()
            .map(|style| style.name.clone())
            .collect(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn press_release(
    State(state): State<AgentState>,
    Json(brief): Json<PressReleaseRequest>,
) -> impl IntoResponse {
    info!(
        "Received brief '{}' from {} for {:?}",
        brief.title, brief.company_name, brief.target_outlets
    );
    let response = state.orchestrator.run(&brief).await;
    info!(
        "Returning {} releases for {}",
        response.generated_releases.len(),
        response.request_id
    );
    Json(response)
}

pub fn build_router(state: AgentState) -> Router {
    Router::new()
        .route("/messages/press-release", post(press_release))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn config_defaults_and_overrides() {
        let empty: HashMap<&str, &str> = HashMap::new();
        let config = AgentConfig::from_lookup(|k| empty.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!((config.host.as_str(), config.port), ("0.0.0.0", 8001));
        assert_eq!(config.content.strategy, Strategy::Template);

        let set: HashMap<&str, &str> = [
            ("PRCONNECT_AGENT_PORT", "9100"),
            ("PRCONNECT_CONTENT_STRATEGY", "delegated"),
        ]
        .into_iter()
        .collect();
        let config = AgentConfig::from_lookup(|k| set.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.content.strategy, Strategy::Delegated);
    }

    #[test]
    fn bad_port_is_an_error() {
        let set: HashMap<&str, &str> = [("PRCONNECT_AGENT_PORT", "eighty")].into_iter().collect();
        assert!(AgentConfig::from_lookup(|k| set.get(k).map(|v| v.to_string())).is_err());
    }
}
