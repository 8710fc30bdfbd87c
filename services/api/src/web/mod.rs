pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    create_share_handler, export_handler, get_share_handler, list_available_handler,
    update_share_handler, verify_pin_handler,
};
use state::AppState;

/// Builds the share API routes over the given state.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/shared", post(create_share_handler))
        .route(
            "/shared/{share_id}",
            get(get_share_handler).put(update_share_handler),
        )
        .route("/shared/{share_id}/verify-pin", post(verify_pin_handler))
        .route("/videos/{video_id}/shared", get(list_available_handler))
        .route("/export/{format}", post(export_handler))
        .with_state(app_state)
}
