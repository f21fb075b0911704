use std::collections::BTreeMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use prconnect_types::api::{Envelope, OutletInfo};

use crate::state::{AppState, with_db};

pub const CATEGORIES: &[&str] = &[
    "Product Launch",
    "Funding Round",
    "Acquisition",
    "Partnership",
    "Executive Appointment",
    "Company Milestone",
    "Event Announcement",
    "Research & Development",
    "Awards & Recognition",
    "Other",
];

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub agent: &'static str,
    pub available_outlets: usize,
    pub available_categories: usize,
    pub timestamp: String,
}

pub async fn root() -> impl IntoResponse {
    Json(Envelope::ok(ServiceInfo {
        service: "PR-Connect API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Envelope::ok(Health {
        status: "healthy",
        agent: if state.dispatcher.has_agent() { "remote" } else { "in-process" },
        available_outlets: state.dispatcher.registry().iter().count(),
        available_categories: CATEGORIES.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Known profiles, plus any outlet names that only exist in the store.
pub async fn outlets(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.dispatcher.registry();
    let mut outlets: BTreeMap<String, OutletInfo> = registry
        .iter()
        .map(|style| {
            (
                style.name.clone(),
                OutletInfo {
                    description: style.description.clone(),
                    audience: style.audience.clone(),
                    tone: style.tone.clone(),
                },
            )
        })
        .collect();

    match with_db(&state, |db| db.list_outlets()).await {
        Ok(stored) => {
            for outlet in stored {
                outlets.entry(outlet.name.clone()).or_insert_with(|| OutletInfo {
                    description: format!("Coverage for {}", outlet.name),
                    audience: "General audience".into(),
                    tone: registry.resolve(&outlet.name).tone.clone(),
                });
            }
        }
        Err(e) => warn!("Serving built-in outlets only: {}", e),
    }

    Json(Envelope::ok(outlets))
}

pub async fn categories() -> impl IntoResponse {
    Json(Envelope::ok(CATEGORIES).with_count(CATEGORIES.len()))
}
