pub mod health;
pub mod interviews;
pub mod questions;
pub mod reports;
pub mod tags;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Questions
        .route(
            "/api/questions/generate",
            post(questions::handle_generate_questions),
        )
        .route("/api/questions", get(questions::handle_list_questions))
        .route("/api/questions/:id", get(questions::handle_get_question))
        // Tags
        .route(
            "/api/tags",
            get(tags::handle_list_tags).post(tags::handle_create_tag),
        )
        .route("/api/tags/:id", get(tags::handle_get_tag))
        .route("/api/tags/:id/questions", get(tags::handle_tag_questions))
        // Interviews
        .route(
            "/api/interviews/generate",
            post(interviews::handle_generate_interview),
        )
        .route("/api/interviews", get(interviews::handle_list_interviews))
        .route("/api/interviews/:id", get(interviews::handle_get_interview))
        .route(
            "/api/interviews/:id/submit",
            post(interviews::handle_submit_interview),
        )
        // Reports
        .route("/api/reports", get(reports::handle_list_reports))
        .route(
            "/api/reports/:id",
            get(reports::handle_get_report).delete(reports::handle_delete_report),
        )
        .route("/api/reports/:id/answers", get(reports::handle_report_answers))
        .with_state(state)
}
