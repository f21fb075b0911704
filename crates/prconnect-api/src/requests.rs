use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;

use prconnect_types::api::{Claims, Envelope};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

const NOT_FOUND: &str = "Request not found or access denied";

/// `GET /api/requests`: the caller's requests, newest first.
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let requests = with_db(&state, move |db| db.list_requests_for_user(&user_id)).await?;
    let count = requests.len();
    Ok(Json(Envelope::ok(requests).with_count(count)))
}

pub async fn get_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let request = with_db(&state, move |db| db.get_request_for_user(id, &user_id))
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(Envelope::ok(request)))
}

/// Responses go with it via ON DELETE CASCADE.
pub async fn delete_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let title = with_db(&state, move |db| db.delete_request_for_user(id, &user_id))
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    info!("User {} deleted request {} ({})", claims.email, id, title);
    Ok(Json(Envelope::done(format!("Successfully deleted request '{title}'"))))
}
