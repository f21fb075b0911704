use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// How release text is produced. Picked at deploy time, never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Template,
    Delegated,
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "delegated" | "ai" => Ok(Self::Delegated),
            other => bail!("unknown content strategy '{other}' (expected template or delegated)"),
        }
    }
}

/// Chat-completion provider settings for the delegated strategy.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1500,
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    pub strategy: Strategy,
    pub provider: ProviderConfig,
}

impl ContentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = ProviderConfig::default();

        let strategy = match get("PRCONNECT_CONTENT_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => Strategy::default(),
        };

        let provider = ProviderConfig {
            api_key: get("PRCONNECT_LLM_API_KEY"),
            base_url: get("PRCONNECT_LLM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: get("PRCONNECT_LLM_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(get("PRCONNECT_LLM_TEMPERATURE"), "PRCONNECT_LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_or(get("PRCONNECT_LLM_MAX_TOKENS"), "PRCONNECT_LLM_MAX_TOKENS", defaults.max_tokens)?,
            timeout: match get("PRCONNECT_LLM_TIMEOUT_SECS") {
                Some(raw) => Duration::from_secs(
                    raw.parse()
                        .with_context(|| format!("PRCONNECT_LLM_TIMEOUT_SECS: invalid value '{raw}'"))?,
                ),
                None => defaults.timeout,
            },
        };

        Ok(Self { strategy, provider })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key}: invalid value '{raw}'")),
        None => Ok(default),
    }
}
