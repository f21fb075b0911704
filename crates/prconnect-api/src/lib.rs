//! HTTP surface of the PR-Connect API service.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod generate;
pub mod middleware;
pub mod requests;
pub mod routes;
pub mod state;
pub mod transcripts;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::{AppState, AppStateInner};
