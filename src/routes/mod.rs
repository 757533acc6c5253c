use axum::{Router, http::Uri};

use crate::{error::AppError, state::AppState};

pub mod admin;
pub mod agent;
pub mod assistant;
pub mod auth;
pub mod client;
pub mod doc;
pub mod health;
pub mod notifications;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", auth::profile_router())
        .nest("/client", client::router())
        .nest("/assistant", assistant::router())
        .nest("/agent", agent::router())
        .nest("/admin", admin::router())
        .nest("/notifications", notifications::router())
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route introuvable : {}", uri.path()))
}
