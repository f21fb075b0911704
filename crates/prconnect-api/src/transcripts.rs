use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use prconnect_types::api::{Claims, CreateTranscriptRequest, Envelope};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

const NOT_FOUND: &str = "Transcript not found or access denied";

pub async fn create_transcript(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateTranscriptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::bad_request("Transcript text is required"));
    }

    let user_id = claims.sub.to_string();
    let transcript = with_db(&state, move |db| db.insert_transcript(&user_id, &text)).await?;
    info!(
        "User {} saved transcript {}: {} words",
        claims.email, transcript.id, transcript.word_count
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(transcript).with_message("Transcript saved successfully")),
    ))
}

pub async fn list_transcripts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let transcripts = with_db(&state, move |db| db.list_transcripts(&user_id)).await?;
    let count = transcripts.len();
    Ok(Json(Envelope::ok(transcripts).with_count(count)))
}

pub async fn get_transcript(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let transcript = with_db(&state, move |db| db.get_transcript(id, &user_id))
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(Envelope::ok(transcript)))
}

pub async fn delete_transcript(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    if !with_db(&state, move |db| db.delete_transcript(id, &user_id)).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    Ok(Json(Envelope::done("Transcript deleted successfully")))
}
