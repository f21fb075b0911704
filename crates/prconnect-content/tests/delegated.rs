use std::time::Duration;

use prconnect_content::{
    ContentConfig, ContentGenerator, FallbackReason, Generation, Orchestrator, OutletRegistry,
    ProviderConfig, Strategy,
};
use prconnect_types::messages::PressReleaseRequest;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn delegated(server: &MockServer, api_key: Option<&str>) -> ContentGenerator {
    let config = ContentConfig {
        strategy: Strategy::Delegated,
        provider: ProviderConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.uri(),
            timeout: Duration::from_millis(500),
            ..Default::default()
        },
    };
    ContentGenerator::new(config, OutletRegistry::builtin()).unwrap()
}

fn template() -> ContentGenerator {
    ContentGenerator::template_only(OutletRegistry::builtin())
}

fn brief(outlets: &[&str]) -> PressReleaseRequest {
    PressReleaseRequest {
        title: "Acme Launches Rocket Skates".into(),
        body: "Acme today announced the launch of rocket-powered roller skates.".into(),
        company_name: "Acme".into(),
        target_outlets: outlets.iter().map(|o| o.to_string()).collect(),
        category: "Product Launch".into(),
        contact_info: Some("press@acme.test".into()),
        additional_notes: None,
    }
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

fn long_markdown(outlet: &str) -> String {
    format!(
        "# Acme Launches Rocket Skates\n\n{outlet} exclusive: Acme has unveiled rocket-powered roller \
         skates, promising commuters a faster and considerably louder trip to work.   \n\n\n\nMore soon."
    )
}

#[tokio::test]
async fn successful_reply_is_used_verbatim_after_normalizing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&long_markdown("TechCrunch"))))
        .expect(1)
        .mount(&server)
        .await;

    let generation = delegated(&server, Some("sk-test"))
        .generate(&brief(&["TechCrunch"]), "TechCrunch")
        .await;

    let Generation::Delegated(release) = generation else {
        panic!("expected delegated generation, got {}", generation.kind());
    };
    assert!(release.content.starts_with("# Acme Launches Rocket Skates"));
    assert!(release.content.ends_with("louder trip to work.\n\nMore soon."));
    assert_eq!(release.word_count, release.content.split_whitespace().count());
    assert_eq!(release.tone, "Direct, tech-focused, startup-friendly");
}

#[tokio::test]
async fn fenced_json_envelope_supplies_content_and_tone() {
    let server = MockServer::start().await;
    let envelope = json!({ "content": long_markdown("Forbes"), "tone": "Measured" }).to_string();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&format!(
            "Sure! Here is the release:\n```json\n{envelope}\n```\nLet me know if you want changes."
        ))))
        .mount(&server)
        .await;

    let release = delegated(&server, Some("sk-test"))
        .generate(&brief(&["Forbes"]), "Forbes")
        .await
        .into_release();

    assert!(release.content.contains("Forbes exclusive"));
    assert!(!release.content.contains("```"));
    assert!(!release.content.contains("Sure!"));
    assert_eq!(release.tone, "Measured");
}

#[tokio::test]
async fn server_error_falls_back_to_identical_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let b = brief(&["The Verge"]);
    let got = delegated(&server, Some("sk-test")).generate(&b, "The Verge").await;
    let want = template().generate(&b, "The Verge").await;

    match &got {
        Generation::Fallback { reason, .. } => assert_eq!(*reason, FallbackReason::Status(500)),
        other => panic!("expected fallback, got {}", other.kind()),
    }
    assert_eq!(got.release(), want.release());
}

#[tokio::test]
async fn too_short_reply_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Too short.")))
        .mount(&server)
        .await;

    let generation = delegated(&server, Some("sk-test"))
        .generate(&brief(&["General"]), "General")
        .await;

    assert!(matches!(
        generation,
        Generation::Fallback { reason: FallbackReason::TooShort(10), .. }
    ));
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let generation = delegated(&server, Some("sk-test"))
        .generate(&brief(&["Forbes"]), "Forbes")
        .await;

    assert!(matches!(
        generation,
        Generation::Fallback { reason: FallbackReason::Malformed(_), .. }
    ));
}

#[tokio::test]
async fn slow_provider_times_out_and_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(&long_markdown("General")))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let b = brief(&["General"]);
    let generation = delegated(&server, Some("sk-test")).generate(&b, "General").await;
    let want = template().generate(&b, "General").await;

    assert!(matches!(
        generation,
        Generation::Fallback { reason: FallbackReason::Timeout, .. }
    ));
    assert_eq!(generation.release(), want.release());
}

#[tokio::test]
async fn missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&long_markdown("General"))))
        .expect(0)
        .mount(&server)
        .await;

    let b = brief(&["General"]);
    let generation = delegated(&server, None).generate(&b, "General").await;

    assert!(matches!(
        generation,
        Generation::Fallback { reason: FallbackReason::MissingCredentials, .. }
    ));
    assert_eq!(generation.release(), template().generate(&b, "General").await.release());
}

#[tokio::test]
async fn each_outlet_falls_back_independently_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Target outlet: Forbes"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&long_markdown("TechCrunch"))))
        .mount(&server)
        .await;

    let b = brief(&["TechCrunch", "Forbes"]);
    let response = Orchestrator::new(delegated(&server, Some("sk-test"))).run(&b).await;

    assert_eq!(response.generated_releases.len(), 2);
    assert_eq!(response.generated_releases[0].outlet, "TechCrunch");
    assert!(response.generated_releases[0].content.contains("TechCrunch exclusive"));

    assert_eq!(response.generated_releases[1].outlet, "Forbes");
    let forbes_template = template().generate(&b, "Forbes").await.into_release();
    assert_eq!(response.generated_releases[1], forbes_template);
}
