use axum_test::TestServer;
use serde_json::{Value, json};

use prconnect_agent::{AgentState, build_router};
use prconnect_content::{ContentGenerator, Orchestrator, OutletRegistry, Strategy};
use prconnect_types::messages::PressReleaseResponse;

fn server() -> TestServer {
    let orchestrator = Orchestrator::new(ContentGenerator::template_only(OutletRegistry::builtin()));
    TestServer::new(build_router(AgentState::new(orchestrator, Strategy::Template))).unwrap()
}

#[tokio::test]
async fn health_lists_outlets() {
    let body: Value = server().get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["strategy"], "template");
    assert_eq!(body["outlets"], json!(["TechCrunch", "The Verge", "Forbes", "General"]));
}

#[tokio::test]
async fn press_release_round_trip() {
    let response = server()
        .post("/messages/press-release")
        .json(&json!({
            "title": "Acme Opens Lunar Office",
            "body": "Acme is expanding to the Moon through a partnership with NASA.",
            "company_name": "Acme",
            "category": "Partnership",
            "target_outlets": ["Forbes", "Unknown Gazette"]
        }))
        .await;
    response.assert_status_ok();

    let reply: PressReleaseResponse = response.json();
    assert_eq!(reply.status, "completed");
    assert_eq!(reply.company_name, "Acme");
    assert_eq!(reply.generated_releases.len(), 2);
    assert_eq!(reply.generated_releases[0].outlet, "Forbes");
    assert!(reply.generated_releases[0].content.contains("strategic alliance"));
    assert_eq!(reply.generated_releases[1].outlet, "Unknown Gazette");
    assert!(reply.generated_releases[1].content.starts_with("FOR IMMEDIATE RELEASE"));
}
