use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod services;
pub mod upload;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024)) // 100MB
}
