pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::generation::handlers as generation;
use crate::interviews::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route(
            "/api/v1/interviews/generate",
            post(generation::handle_generate_interview),
        )
        // Interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_my_interviews),
        )
        .route(
            "/api/v1/interviews/latest",
            get(interviews::handle_latest_interviews),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            get(feedback::handle_get_interview_feedback),
        )
        // Interview lists
        .route(
            "/api/v1/interview-lists",
            get(interviews::handle_list_my_interview_lists),
        )
        .route(
            "/api/v1/interview-lists/:id",
            get(interviews::handle_get_interview_list),
        )
        .route(
            "/api/v1/interview-lists/:id/interviews",
            get(interviews::handle_list_interviews_by_parent),
        )
        .route(
            "/api/v1/interview-lists/:id/overview",
            post(feedback::handle_refresh_overview),
        )
        // Feedback
        .route("/api/v1/feedback", post(feedback::handle_create_feedback))
        .with_state(state)
}
