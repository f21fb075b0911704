use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use prconnect_types::api::Envelope;

/// Everything a handler can fail with. Each variant renders as the standard
/// `{success: false, message}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Admin access required")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    /// Unexpected failure; details are logged, never returned.
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    /// The generation batch could not be committed.
    #[error("Error processing request")]
    Processing(#[source] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Reclassify a store failure as a failed generation batch.
    pub fn into_processing(self) -> Self {
        match self {
            Self::Internal(e) => Self::Processing(e),
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Json(rejection) => rejection.status(),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => error!("Internal error: {:#}", e),
            Self::Processing(e) => error!("Failed to store generation: {:#}", e),
            _ => {}
        }
        let message = match &self {
            Self::Json(rejection) => format!("Invalid request body: {}", rejection.body_text()),
            other => other.to_string(),
        };
        (self.status(), Json(Envelope::<()>::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::Internal(anyhow::anyhow!("disk on fire at /var/lib"));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_failures_become_processing_errors() {
        let err = ApiError::Internal(anyhow::anyhow!("commit failed")).into_processing();
        assert_eq!(err.to_string(), "Error processing request");

        let untouched = ApiError::Forbidden.into_processing();
        assert_eq!(untouched.status(), StatusCode::FORBIDDEN);
    }
}
