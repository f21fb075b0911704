use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user account. The password hash never leaves the DB layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsOutlet {
    pub id: i64,
    pub name: String,
}

/// Stored generation text for a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub id: i64,
    pub body: String,
    pub request_id: i64,
    pub tone: Option<String>,
    pub word_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A stored brief, scoped to one outlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub news_outlet_id: i64,
    pub user_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub category: Option<String>,
    pub contact_info: Option<String>,
    pub additional_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub news_outlet: Option<NewsOutlet>,
    pub responses: Vec<StoredResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: i64,
    pub text: String,
    pub word_count: i64,
    pub preview: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
