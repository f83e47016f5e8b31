use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/verify-email", post(handlers::verify_email))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password/:token", post(handlers::reset_password))
        .route("/check-auth", get(handlers::check_auth))
}
