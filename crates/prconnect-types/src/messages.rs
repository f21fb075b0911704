use serde::{Deserialize, Serialize};

/// Status string reported for every finished generation run.
pub const STATUS_COMPLETED: &str = "completed";

/// A press-release brief. Sent by the API service to the content agent and
/// accepted verbatim by `POST /generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PressReleaseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub company_name: String,
    /// e.g. "TechCrunch", "The Verge", "Forbes", "General"
    #[serde(default)]
    pub target_outlets: Vec<String>,
    /// e.g. "Product Launch", "Funding Round", "Acquisition"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

/// One outlet-styled release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPressRelease {
    pub outlet: String,
    pub content: String,
    pub tone: String,
    pub word_count: usize,
}

/// Result of a generation run across all requested outlets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressReleaseResponse {
    pub request_id: String,
    pub company_name: String,
    pub category: String,
    pub generated_releases: Vec<GeneratedPressRelease>,
    pub timestamp: String,
    pub status: String,
}
