//! Database row types. These map directly to SQLite rows and are converted to
//! the `prconnect-types` models at the edge of this crate.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use prconnect_types::models::{NewsOutlet, StoredRequest, StoredResponse, Transcript, User};

pub struct UserRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub company_name: &'a str,
    pub is_admin: bool,
}

/// Profile fields to change. `None` leaves the column untouched.
#[derive(Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

pub struct OutletRow {
    pub id: i64,
    pub name: String,
}

pub struct RequestRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub news_outlet_id: i64,
    pub outlet_name: Option<String>,
    pub user_id: Option<String>,
    pub company_name: Option<String>,
    pub category: Option<String>,
    pub contact_info: Option<String>,
    pub additional_notes: Option<String>,
    pub created_at: String,
}

pub struct ResponseRow {
    pub id: i64,
    pub body: String,
    pub request_id: i64,
    pub tone: Option<String>,
    pub word_count: Option<i64>,
    pub created_at: String,
}

pub struct TranscriptRow {
    pub id: i64,
    pub text: String,
    pub word_count: i64,
    pub preview: String,
    pub user_id: Option<String>,
    pub created_at: String,
}

/// Per-outlet usage, including outlets nobody has used yet.
pub struct OutletUsageRow {
    pub id: i64,
    pub name: String,
    pub total_usage: i64,
    pub unique_users: i64,
}

pub struct TableCounts {
    pub users: i64,
    pub requests: i64,
    pub responses: i64,
    pub transcripts: i64,
}

/// Parse a SQLite timestamp. `datetime('now')` yields "YYYY-MM-DD HH:MM:SS"
/// without a timezone, so treat it as naive UTC.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

fn parse_user_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|id| match id.parse() {
        Ok(uid) => Some(uid),
        Err(e) => {
            warn!("Corrupt user id '{}': {}", id, e);
            None
        }
    })
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            id: self.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt user id '{}': {}", self.id, e);
                Uuid::default()
            }),
            full_name: self.full_name,
            email: self.email,
            company_name: self.company_name,
            phone: self.phone,
            location: self.location,
            is_active: self.is_active,
            is_admin: self.is_admin,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        }
    }
}

impl ResponseRow {
    pub fn into_response(self) -> StoredResponse {
        StoredResponse {
            id: self.id,
            body: self.body,
            request_id: self.request_id,
            tone: self.tone,
            word_count: self.word_count,
            created_at: parse_timestamp(&self.created_at),
        }
    }
}

impl RequestRow {
    pub fn into_request(self, responses: Vec<StoredResponse>) -> StoredRequest {
        let news_outlet = self.outlet_name.map(|name| NewsOutlet {
            id: self.news_outlet_id,
            name,
        });
        StoredRequest {
            id: self.id,
            title: self.title,
            body: self.body,
            news_outlet_id: self.news_outlet_id,
            user_id: parse_user_id(self.user_id.as_deref()),
            company_name: self.company_name,
            category: self.category,
            contact_info: self.contact_info,
            additional_notes: self.additional_notes,
            created_at: parse_timestamp(&self.created_at),
            news_outlet,
            responses,
        }
    }
}

impl TranscriptRow {
    pub fn into_transcript(self) -> Transcript {
        Transcript {
            id: self.id,
            text: self.text,
            word_count: self.word_count,
            preview: self.preview,
            user_id: parse_user_id(self.user_id.as_deref()),
            created_at: parse_timestamp(&self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        let naive = parse_timestamp("2025-03-04 05:06:07");
        assert_eq!((naive.year(), naive.month(), naive.day()), (2025, 3, 4));
        assert_eq!((naive.hour(), naive.minute(), naive.second()), (5, 6, 7));

        let rfc = parse_timestamp("2025-03-04T05:06:07Z");
        assert_eq!(naive, rfc);
    }

    #[test]
    fn corrupt_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("yesterday"), DateTime::<Utc>::default());
    }
}
