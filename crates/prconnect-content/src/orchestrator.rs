use chrono::{DateTime, Utc};
use tracing::{info, warn};

use prconnect_types::messages::{PressReleaseRequest, PressReleaseResponse, STATUS_COMPLETED};

use crate::generator::{ContentGenerator, Generation};
use crate::outlets::GENERAL;

/// Runs the generator across every outlet in a brief.
pub struct Orchestrator {
    generator: ContentGenerator,
}

impl Orchestrator {
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ContentGenerator {
        &self.generator
    }

    /// Outlets are handled one after another, in the order given, duplicates
    /// included. An empty list means General.
    pub async fn run(&self, brief: &PressReleaseRequest) -> PressReleaseResponse {
        self.run_at(brief, Utc::now()).await
    }

    pub(crate) async fn run_at(&self, brief: &PressReleaseRequest, now: DateTime<Utc>) -> PressReleaseResponse {
        let outlets: Vec<&str> = if brief.target_outlets.is_empty() {
            vec![GENERAL]
        } else {
            brief.target_outlets.iter().map(String::as_str).collect()
        };

        info!(
            "Generating press release for {} across {} outlet(s)",
            brief.company_name,
            outlets.len()
        );

        let mut releases = Vec::with_capacity(outlets.len());
        for outlet in outlets {
            let generation = self.generator.generate(brief, outlet).await;
            match &generation {
                Generation::Fallback { reason, .. } => {
                    warn!("Outlet '{}': fallback ({})", outlet, reason)
                }
                other => info!("Outlet '{}': {}", outlet, other.kind()),
            }
            releases.push(generation.into_release());
        }

        PressReleaseResponse {
            request_id: format!("PR_{}", now.format("%Y%m%d_%H%M%S")),
            company_name: brief.company_name.clone(),
            category: brief.category.clone(),
            generated_releases: releases,
            timestamp: now.to_rfc3339(),
            status: STATUS_COMPLETED.to_string(),
        }
    }
}
