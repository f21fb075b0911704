use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use prconnect_content::{ContentGenerator, Orchestrator, OutletRegistry};
use prconnect_types::messages::{PressReleaseRequest, PressReleaseResponse};

const AGENT_TIMEOUT: Duration = Duration::from_secs(30);
const AGENT_OVERHEAD: Duration = Duration::from_secs(10);

/// Longest an agent may legitimately spend on one brief: every outlet
/// waiting out the provider timeout, plus some slack.
pub fn required_agent_timeout(provider_timeout: Duration) -> Duration {
    provider_timeout * crate::generate::MAX_OUTLETS as u32 + AGENT_OVERHEAD
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<reqwest::Error>().is_some_and(|e| e.is_timeout()))
}

/// HTTP client for the content agent service.
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        Self::with_timeout(base_url, AGENT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    pub async fn generate(&self, brief: &PressReleaseRequest) -> Result<PressReleaseResponse> {
        let url = format!("{}/messages/press-release", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(brief)
            .send()
            .await
            .with_context(|| format!("agent request to {url} failed"))?
            .error_for_status()?;

        response
            .json()
            .await
            .context("agent returned an unreadable reply")
    }
}

/// Sends briefs to the agent when one is configured, and generates in
/// process otherwise or whenever the agent comes back empty-handed.
///
/// An agent that times out may already have spent its provider calls, so
/// that case is answered from templates alone instead of repeating them.
pub struct GenerationDispatcher {
    orchestrator: Orchestrator,
    templates: Orchestrator,
    agent: Option<AgentClient>,
}

impl GenerationDispatcher {
    pub fn new(orchestrator: Orchestrator, agent: Option<AgentClient>) -> Self {
        let registry = orchestrator.generator().registry().clone();
        Self {
            orchestrator,
            templates: Orchestrator::new(ContentGenerator::template_only(registry)),
            agent,
        }
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    pub fn registry(&self) -> &OutletRegistry {
        self.orchestrator.generator().registry()
    }

    pub async fn dispatch(&self, brief: &PressReleaseRequest) -> PressReleaseResponse {
        if let Some(agent) = &self.agent {
            match agent.generate(brief).await {
                Ok(response) if !response.generated_releases.is_empty() => {
                    info!(
                        "Agent returned {} releases for {}",
                        response.generated_releases.len(),
                        response.request_id
                    );
                    return response;
                }
                Ok(_) => warn!("Agent returned no releases, generating in process"),
                Err(e) if is_timeout(&e) => {
                    warn!("Agent timed out, answering from templates: {:#}", e);
                    return self.templates.run(brief).await;
                }
                Err(e) => warn!("Agent unavailable, generating in process: {:#}", e),
            }
        }
        self.orchestrator.run(brief).await
    }
}
