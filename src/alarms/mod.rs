use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_alarm))
        .route(
            "/:id",
            get(handlers::list_alarms)
                .put(handlers::update_alarm)
                .delete(handlers::delete_alarm),
        )
}
