use thiserror::Error;
use tracing::warn;

use prconnect_types::messages::{GeneratedPressRelease, PressReleaseRequest};
use prconnect_types::word_count;

use crate::config::{ContentConfig, Strategy};
use crate::delegated::ChatClient;
use crate::outlets::{OutletRegistry, OutletStyle};
use crate::template;

/// Why a delegated generation was replaced by the template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("no provider API key configured")]
    MissingCredentials,
    #[error("provider request timed out")]
    Timeout,
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider reply: {0}")]
    Malformed(String),
    #[error("provider content too short ({0} chars)")]
    TooShort(usize),
}

impl FallbackReason {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// One outlet's release plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Template(GeneratedPressRelease),
    Delegated(GeneratedPressRelease),
    Fallback {
        release: GeneratedPressRelease,
        reason: FallbackReason,
    },
}

impl Generation {
    pub fn release(&self) -> &GeneratedPressRelease {
        match self {
            Self::Template(release) | Self::Delegated(release) => release,
            Self::Fallback { release, .. } => release,
        }
    }

    pub fn into_release(self) -> GeneratedPressRelease {
        match self {
            Self::Template(release) | Self::Delegated(release) => release,
            Self::Fallback { release, .. } => release,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Delegated(_) => "delegated",
            Self::Fallback { .. } => "fallback",
        }
    }
}

enum Backend {
    Template,
    Delegated(ChatClient),
}

pub struct ContentGenerator {
    registry: OutletRegistry,
    backend: Backend,
}

impl ContentGenerator {
    pub fn new(config: ContentConfig, registry: OutletRegistry) -> anyhow::Result<Self> {
        let backend = match config.strategy {
            Strategy::Template => Backend::Template,
            Strategy::Delegated => {
                if config.provider.api_key.is_none() {
                    warn!("Delegated content strategy selected but no API key is set; every outlet will fall back to templates");
                }
                Backend::Delegated(ChatClient::new(config.provider)?)
            }
        };
        Ok(Self { registry, backend })
    }

    pub fn template_only(registry: OutletRegistry) -> Self {
        Self { registry, backend: Backend::Template }
    }

    pub fn registry(&self) -> &OutletRegistry {
        &self.registry
    }

    /// Produce the release for one outlet. Never fails: delegated errors
    /// degrade to the template text for the same brief and outlet.
    pub async fn generate(&self, brief: &PressReleaseRequest, outlet: &str) -> Generation {
        let style = self.registry.resolve(outlet);

        let client = match &self.backend {
            Backend::Template => return Generation::Template(self.from_template(brief, outlet, style)),
            Backend::Delegated(client) => client,
        };

        match client.complete(brief, style).await {
            Ok(reply) => Generation::Delegated(GeneratedPressRelease {
                outlet: outlet.to_string(),
                word_count: word_count(&reply.content),
                tone: reply.tone.unwrap_or_else(|| style.tone.clone()),
                content: reply.content,
            }),
            Err(reason) => {
                warn!("Delegated generation for '{}' fell back to template: {}", outlet, reason);
                Generation::Fallback {
                    release: self.from_template(brief, outlet, style),
                    reason,
                }
            }
        }
    }

    fn from_template(
        &self,
        brief: &PressReleaseRequest,
        outlet: &str,
        style: &OutletStyle,
    ) -> GeneratedPressRelease {
        let content = template::render(brief, style);
        GeneratedPressRelease {
            outlet: outlet.to_string(),
            word_count: word_count(&content),
            tone: style.tone.clone(),
            content,
        }
    }
}
