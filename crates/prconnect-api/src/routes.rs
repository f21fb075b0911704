use axum::{
    Router,
    http::{HeaderValue, Method, header::{AUTHORIZATION, CONTENT_TYPE}},
    middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;
use crate::{admin, auth, catalog, dashboard, generate, requests, transcripts};

/// Permissive when no origins are configured.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public_routes = Router::new()
        .route("/", get(catalog::root))
        .route("/health", get(catalog::health))
        .route("/api/outlets", get(catalog::outlets))
        .route("/api/categories", get(catalog::categories))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/generate", post(generate::generate))
        .route("/api/auth/profile", get(auth::profile).put(auth::update_profile))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/requests", get(requests::list_requests))
        .route(
            "/api/requests/{id}",
            get(requests::get_request).delete(requests::delete_request),
        )
        .route(
            "/api/transcripts",
            get(transcripts::list_transcripts).post(transcripts::create_transcript),
        )
        .route(
            "/api/transcripts/{id}",
            get(transcripts::get_transcript).delete(transcripts::delete_transcript),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Layers run bottom-up: require_auth wraps require_admin.
    let admin_routes = Router::new()
        .route("/api/admin/requests", get(admin::list_requests))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/newspapers", get(admin::newspapers))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
