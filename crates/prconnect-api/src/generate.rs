use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use tracing::{info, warn};

use prconnect_types::api::{Claims, Envelope};
use prconnect_types::messages::PressReleaseRequest;

use crate::error::ApiError;
use crate::state::{AppState, with_db};

const MAX_TITLE: usize = 100;
const MAX_BODY: usize = 2000;
const MAX_COMPANY: usize = 100;
const MAX_CATEGORY: usize = 50;
const MAX_CONTACT: usize = 200;
pub const MAX_OUTLETS: usize = 10;
const MAX_OUTLET_NAME: usize = 100;

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

pub fn validate(brief: &PressReleaseRequest) -> Result<(), ApiError> {
    let limits = [
        ("title", brief.title.as_str(), MAX_TITLE),
        ("body", brief.body.as_str(), MAX_BODY),
        ("company_name", brief.company_name.as_str(), MAX_COMPANY),
        ("category", brief.category.as_str(), MAX_CATEGORY),
        ("contact_info", brief.contact_info.as_deref().unwrap_or_default(), MAX_CONTACT),
    ];
    for (field, value, max) in limits {
        if too_long(value, max) {
            return Err(ApiError::bad_request(format!(
                "Field '{field}' must be at most {max} characters"
            )));
        }
    }

    if brief.target_outlets.len() > MAX_OUTLETS {
        return Err(ApiError::bad_request(format!(
            "At most {MAX_OUTLETS} target outlets are allowed"
        )));
    }
    if brief.target_outlets.iter().any(|o| too_long(o, MAX_OUTLET_NAME)) {
        return Err(ApiError::bad_request(format!(
            "Outlet names must be at most {MAX_OUTLET_NAME} characters"
        )));
    }
    Ok(())
}

/// `POST /generate`: produce one release per outlet and store them all.
pub async fn generate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<PressReleaseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(brief) = payload?;
    validate(&brief)?;

    info!(
        "Generation requested by {} for {} outlet(s)",
        claims.email,
        brief.target_outlets.len()
    );
    let response = state.dispatcher.dispatch(&brief).await;

    let user_id = claims.sub.to_string();
    let releases = response.generated_releases.clone();
    let batch = with_db(&state, move |db| db.store_generation(&user_id, &brief, &releases))
        .await
        .map_err(ApiError::into_processing)?;
    if !batch.skipped.is_empty() {
        warn!("Outlets not stored for {}: {:?}", response.request_id, batch.skipped);
    }

    let message = format!(
        "Generated {} press releases successfully",
        response.generated_releases.len()
    );
    Ok(Json(Envelope::ok(response).with_message(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> PressReleaseRequest {
        PressReleaseRequest {
            title: "Launch".into(),
            body: "Body".into(),
            company_name: "Acme".into(),
            category: "Product Launch".into(),
            target_outlets: vec!["TechCrunch".into()],
            ..Default::default()
        }
    }

    #[test]
    fn accepts_limits_exactly() {
        let mut b = brief();
        b.title = "t".repeat(MAX_TITLE);
        b.body = "b".repeat(MAX_BODY);
        b.target_outlets = vec!["o".repeat(MAX_OUTLET_NAME); MAX_OUTLETS];
        assert!(validate(&b).is_ok());
    }

    #[test]
    fn rejects_each_overlong_field() {
        let mut b = brief();
        b.category = "c".repeat(MAX_CATEGORY + 1);
        assert!(matches!(validate(&b), Err(ApiError::BadRequest(m)) if m.contains("category")));

        let mut b = brief();
        b.contact_info = Some("c".repeat(MAX_CONTACT + 1));
        assert!(validate(&b).is_err());

        let mut b = brief();
        b.target_outlets = vec!["Forbes".into(); MAX_OUTLETS + 1];
        assert!(validate(&b).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut b = brief();
        b.title = "é".repeat(MAX_TITLE);
        assert!(validate(&b).is_ok());
    }
}
