//! Client for an OpenAI-compatible chat-completion endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use prconnect_types::messages::PressReleaseRequest;

use crate::config::ProviderConfig;
use crate::generator::FallbackReason;
use crate::outlets::OutletStyle;
use crate::reply::{self, ParsedReply};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct ChatClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ChatClient {
    pub fn new(config: ProviderConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Ask the provider for one outlet's release. Any failure is returned as
    /// the reason the caller should fall back to the template.
    pub async fn complete(
        &self,
        brief: &PressReleaseRequest,
        style: &OutletStyle,
    ) -> Result<ParsedReply, FallbackReason> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FallbackReason::MissingCredentials)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt(style) },
                ChatMessage { role: "user", content: user_prompt(brief, style) },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        debug!("Requesting {} release from {}", style.name, url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(FallbackReason::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackReason::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| FallbackReason::Malformed(e.to_string()))?;

        let raw = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FallbackReason::Malformed("reply has no choices".into()))?
            .message
            .content
            .unwrap_or_default();

        let parsed = reply::parse(&raw);
        if reply::is_too_short(&parsed.content) {
            return Err(FallbackReason::TooShort(parsed.content.chars().count()));
        }
        Ok(parsed)
    }
}

fn system_prompt(style: &OutletStyle) -> String {
    format!(
        "You are an experienced PR writer producing press releases tailored to specific \
         publications. {}\n\nReply with the finished press release in markdown, or with a JSON \
         object of the form {{\"content\": \"...\", \"tone\": \"...\"}}.",
        style.instructions
    )
}

fn user_prompt(brief: &PressReleaseRequest, style: &OutletStyle) -> String {
    let mut lines = vec![
        format!("Target outlet: {}", style.name),
        format!("Outlet tone: {}", style.tone),
        format!("Outlet style: {}", style.style),
        format!("Typical length: {}", style.typical_length),
        String::new(),
        format!("Title: {}", brief.title),
        format!("Company: {}", brief.company_name),
        format!("Category: {}", brief.category),
        format!("Announcement:\n{}", brief.body),
    ];
    if let Some(contact) = brief.contact_info.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!("Media contact: {contact}"));
    }
    if let Some(notes) = brief.additional_notes.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(format!("Additional notes: {notes}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlets::OutletRegistry;

    #[test]
    fn prompts_carry_brief_and_outlet_guidance() {
        let registry = OutletRegistry::builtin();
        let forbes = registry.resolve("Forbes");
        let brief = PressReleaseRequest {
            title: "Q3 Results".into(),
            body: "Revenue grew 40%.".into(),
            company_name: "Acme".into(),
            category: "Financial".into(),
            additional_notes: Some("Call at 5pm".into()),
            ..Default::default()
        };

        assert!(system_prompt(forbes).contains(&forbes.instructions));
        let user = user_prompt(&brief, forbes);
        assert!(user.contains("Target outlet: Forbes"));
        assert!(user.contains("Revenue grew 40%."));
        assert!(user.contains("Additional notes: Call at 5pm"));
        assert!(!user.contains("Media contact"));
    }

    #[tokio::test]
    async fn missing_key_never_touches_the_network() {
        let client = ChatClient::new(ProviderConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        })
        .unwrap();
        let registry = OutletRegistry::builtin();
        let err = client
            .complete(&PressReleaseRequest::default(), registry.resolve("General"))
            .await
            .unwrap_err();
        assert_eq!(err, FallbackReason::MissingCredentials);
    }
}
