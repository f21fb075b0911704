use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use prconnect_types::api::Claims;

use crate::error::ApiError;
use crate::state::{AppState, with_db};

/// Extract and validate the bearer JWT, then stash its claims for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized("Authentication token required"))?;

    let claims = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthorized("Invalid or expired token")
    })?
    .claims;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must run after `require_auth`. Only active admins pass.
pub async fn require_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = claims.sub.to_string();
    let user = with_db(&state, move |db| db.get_user_by_id(&user_id)).await?;

    match user {
        Some(user) if user.is_active && user.is_admin => Ok(next.run(req).await),
        _ => Err(ApiError::Forbidden),
    }
}
