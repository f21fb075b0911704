use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{StoredRequest, User};

// -- JWT Claims --

/// Claims carried by bearer tokens issued on register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Envelope --

/// JSON wrapper returned by every API endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl Envelope<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            count: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            count: None,
        }
    }
}

// -- Auth --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// Absent fields are left untouched. For `phone` and `location`, an explicit
/// `null` or empty string clears the value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -- Transcripts --

#[derive(Debug, Default, Deserialize)]
pub struct CreateTranscriptRequest {
    #[serde(default)]
    pub text: String,
}

// -- Catalog --

/// Static description of an outlet, served by `GET /api/outlets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletInfo {
    pub description: String,
    pub audience: String,
    pub tone: String,
}

// -- Dashboard --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_requests: usize,
    pub active_requests: usize,
    pub completed_requests: usize,
    pub total_outlets: usize,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: String,
    pub outlets: Vec<String>,
    pub date: String,
    pub category: Option<String>,
}

// -- Admin --

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminRequest {
    #[serde(flatten)]
    pub request: StoredRequest,
    pub user: Option<User>,
    pub response_count: usize,
    pub newspaper: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminRequestList {
    pub requests: Vec<AdminRequest>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(flatten)]
    pub user: User,
    pub total_requests: usize,
    pub total_transcripts: usize,
    pub newspaper_usage: BTreeMap<String, usize>,
    pub newspapers_used: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Overview {
    pub total_users: usize,
    pub total_requests: usize,
    pub total_responses: usize,
    pub total_transcripts: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminActivity {
    pub id: i64,
    pub title: String,
    pub user_name: String,
    pub user_email: String,
    pub company: Option<String>,
    pub outlet: String,
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserOutletStats {
    pub user_name: String,
    pub user_email: String,
    pub company: String,
    pub total_requests: usize,
    pub newspaper_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStats {
    pub overview: Overview,
    pub outlet_stats: Vec<NamedCount>,
    pub category_stats: Vec<NamedCount>,
    pub recent_activity: Vec<AdminActivity>,
    pub user_newspaper_stats: Vec<UserOutletStats>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OutletActivity {
    pub id: i64,
    pub title: String,
    pub user_name: String,
    pub company: Option<String>,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OutletAnalytics {
    pub outlet_id: i64,
    pub outlet_name: String,
    pub total_usage: usize,
    pub unique_users: usize,
    pub recent_activity: Vec<OutletActivity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewspaperAnalytics {
    pub newspaper_analytics: Vec<OutletAnalytics>,
    pub total_outlets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_distinguishes_null_from_absent() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"fullName":"Ada","phone":null}"#).unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Ada"));
        assert_eq!(req.phone, Some(None));
        assert_eq!(req.location, None);
    }

    #[test]
    fn envelope_omits_empty_fields() {
        let json = serde_json::to_value(Envelope::<()>::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "nope" }));
    }
}
