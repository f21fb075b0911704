//! Administrative views across all users. Mounted behind `require_admin`.

use std::collections::{BTreeMap, HashMap};

use axum::{Json, extract::State, response::IntoResponse};
use uuid::Uuid;

use prconnect_types::api::{
    AdminActivity, AdminRequest, AdminRequestList, AdminStats, AdminUser, Envelope, NamedCount,
    NewspaperAnalytics, OutletActivity, OutletAnalytics, Overview, UserOutletStats,
};
use prconnect_types::models::{StoredRequest, User};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

const RECENT_ACTIVITY: u32 = 20;
const OUTLET_ACTIVITY: u32 = 5;
const UNKNOWN: &str = "Unknown";

fn outlet_name(request: &StoredRequest) -> String {
    request
        .news_outlet
        .as_ref()
        .map(|o| o.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn owner<'a>(users: &'a HashMap<Uuid, User>, request: &StoredRequest) -> Option<&'a User> {
    request.user_id.as_ref().and_then(|id| users.get(id))
}

/// Outlet name → request count.
fn outlet_breakdown<'a>(requests: impl Iterator<Item = &'a StoredRequest>) -> BTreeMap<String, usize> {
    let mut breakdown = BTreeMap::new();
    for request in requests {
        if let Some(outlet) = &request.news_outlet {
            *breakdown.entry(outlet.name.clone()).or_insert(0) += 1;
        }
    }
    breakdown
}

fn named_counts(rows: Vec<(String, i64)>) -> Vec<NamedCount> {
    rows.into_iter()
        .map(|(name, count)| NamedCount { name, count: count as usize })
        .collect()
}

pub async fn list_requests(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let list = with_db(&state, |db| {
        let users: HashMap<Uuid, User> = db
            .list_users()?
            .into_iter()
            .map(|row| {
                let user = row.into_user();
                (user.id, user)
            })
            .collect();

        let requests: Vec<AdminRequest> = db
            .list_all_requests()?
            .into_iter()
            .map(|request| AdminRequest {
                user: owner(&users, &request).cloned(),
                response_count: request.responses.len(),
                newspaper: outlet_name(&request),
                request,
            })
            .collect();

        Ok(AdminRequestList { total: requests.len(), requests })
    })
    .await?;

    Ok(Json(Envelope::ok(list)))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = with_db(&state, |db| {
        let requests = db.list_all_requests()?;
        let transcripts = db.transcript_counts_by_user()?;

        let users = db
            .list_users()?
            .into_iter()
            .map(|row| {
                let total_transcripts = transcripts.get(&row.id).copied().unwrap_or(0) as usize;
                let user = row.into_user();
                let own: Vec<&StoredRequest> = requests
                    .iter()
                    .filter(|r| r.user_id == Some(user.id))
                    .collect();
                let newspaper_usage = outlet_breakdown(own.iter().copied());

                AdminUser {
                    total_requests: own.len(),
                    total_transcripts,
                    newspapers_used: newspaper_usage.keys().cloned().collect(),
                    newspaper_usage,
                    user,
                }
            })
            .collect::<Vec<_>>();
        Ok(users)
    })
    .await?;

    let count = users.len();
    Ok(Json(Envelope::ok(users).with_count(count)))
}

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = with_db(&state, |db| {
        let counts = db.table_counts()?;
        let users: Vec<User> = db.list_users()?.into_iter().map(|r| r.into_user()).collect();
        let by_id: HashMap<Uuid, User> = users.iter().map(|u| (u.id, u.clone())).collect();
        let all = db.list_all_requests()?;

        let recent_activity = db
            .recent_requests(RECENT_ACTIVITY)?
            .into_iter()
            .map(|r| {
                let user = owner(&by_id, &r);
                AdminActivity {
                    id: r.id,
                    outlet: outlet_name(&r),
                    user_name: user.map_or_else(|| UNKNOWN.to_string(), |u| u.full_name.clone()),
                    user_email: user.map_or_else(|| UNKNOWN.to_string(), |u| u.email.clone()),
                    title: r.title,
                    company: r.company_name,
                    category: r.category,
                    created_at: r.created_at.to_rfc3339(),
                }
            })
            .collect();

        let user_newspaper_stats = users
            .iter()
            .filter_map(|user| {
                let own: Vec<&StoredRequest> =
                    all.iter().filter(|r| r.user_id == Some(user.id)).collect();
                if own.is_empty() {
                    return None;
                }
                Some(UserOutletStats {
                    user_name: user.full_name.clone(),
                    user_email: user.email.clone(),
                    company: user.company_name.clone(),
                    total_requests: own.len(),
                    newspaper_breakdown: outlet_breakdown(own.into_iter()),
                })
            })
            .collect();

        Ok(AdminStats {
            overview: Overview {
                total_users: counts.users as usize,
                total_requests: counts.requests as usize,
                total_responses: counts.responses as usize,
                total_transcripts: counts.transcripts as usize,
            },
            outlet_stats: named_counts(db.outlet_usage()?),
            category_stats: named_counts(db.category_usage()?),
            recent_activity,
            user_newspaper_stats,
        })
    })
    .await?;

    Ok(Json(Envelope::ok(stats)))
}

pub async fn newspapers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let analytics = with_db(&state, |db| {
        let users: HashMap<Uuid, User> = db
            .list_users()?
            .into_iter()
            .map(|row| {
                let user = row.into_user();
                (user.id, user)
            })
            .collect();

        let mut outlets = Vec::new();
        for usage in db.outlet_analytics()? {
            let recent_activity = db
                .recent_requests_for_outlet(usage.id, OUTLET_ACTIVITY)?
                .into_iter()
                .map(|r| OutletActivity {
                    id: r.id,
                    user_name: owner(&users, &r)
                        .map_or_else(|| UNKNOWN.to_string(), |u| u.full_name.clone()),
                    title: r.title,
                    company: r.company_name,
                    date: r.created_at.to_rfc3339(),
                })
                .collect();

            outlets.push(OutletAnalytics {
                outlet_id: usage.id,
                outlet_name: usage.name,
                total_usage: usage.total_usage as usize,
                unique_users: usage.unique_users as usize,
                recent_activity,
            });
        }

        Ok(NewspaperAnalytics {
            total_outlets: outlets.len(),
            newspaper_analytics: outlets,
        })
    })
    .await?;

    Ok(Json(Envelope::ok(analytics)))
}
