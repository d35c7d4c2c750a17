pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dream::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // DREAM assessment API
        .route("/api/v1/dream/questions", get(handlers::handle_list_questions))
        .route(
            "/api/v1/dream/assessments",
            post(handlers::handle_submit_assessment),
        )
        .route(
            "/api/v1/dream/assessments/:id",
            get(handlers::handle_get_assessment).patch(handlers::handle_update_assessment),
        )
        .route(
            "/api/v1/dream/assessments/:id/strategy",
            get(handlers::handle_get_strategy).post(handlers::handle_generate_strategy),
        )
        .with_state(state)
}
