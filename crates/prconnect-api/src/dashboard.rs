use std::collections::HashSet;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};

use prconnect_types::api::{ActivityItem, Claims, DashboardStats, Envelope};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

const RECENT_ACTIVITY: usize = 5;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Coarse relative label, e.g. "3 hours ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed.num_days() > 0 {
        plural(elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        plural(elapsed.num_minutes(), "minute")
    } else {
        "Just now".to_string()
    }
}

/// Every request completes synchronously, so nothing is ever "active".
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let requests = with_db(&state, move |db| db.list_requests_for_user(&user_id)).await?;

    let outlets: HashSet<&str> = requests
        .iter()
        .filter_map(|r| r.news_outlet.as_ref().map(|o| o.name.as_str()))
        .collect();

    let now = Utc::now();
    let recent_activity = requests
        .iter()
        .take(RECENT_ACTIVITY)
        .map(|r| ActivityItem {
            id: r.id,
            kind: "press_release".into(),
            title: r.title.clone(),
            status: "completed".into(),
            outlets: match (&r.news_outlet, r.responses.is_empty()) {
                (Some(outlet), false) => vec![outlet.name.clone()],
                _ => vec![],
            },
            date: time_ago(r.created_at, now),
            category: r.category.clone(),
        })
        .collect();

    Ok(Json(Envelope::ok(DashboardStats {
        total_requests: requests.len(),
        active_requests: 0,
        completed_requests: requests.len(),
        total_outlets: outlets.len(),
        recent_activity,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn labels() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(12), now), "12 days ago");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::minutes(5), now), "Just now");
    }
}
