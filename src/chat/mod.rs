use axum::{routing::post, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod services;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(handlers::chat))
}
