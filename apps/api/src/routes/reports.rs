//! Axum route handlers for the Reports API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::AnswerRow;
use crate::models::report::{Report, ReportRow};
use crate::routes::tags::PageQuery;
use crate::state::AppState;

/// GET /api/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<ReportRow>>, AppError> {
    let reports: Vec<ReportRow> = sqlx::query_as(
        r#"
        SELECT id, interview_id, feedback, assessment, achieved_level, score, created_at
        FROM reports
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit.unwrap_or(100))
    .bind(params.skip.unwrap_or(0))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(reports))
}

/// GET /api/reports/:id
///
/// Returns the report with the interview's answers attached.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<Report>, AppError> {
    let row = fetch_report(&state.db, report_id).await?;
    let answers = load_answers(&state.db, row.interview_id).await?;

    Ok(Json(Report::from_row(row, answers)))
}

/// GET /api/reports/:id/answers
pub async fn handle_report_answers(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<Vec<AnswerRow>>, AppError> {
    let row = fetch_report(&state.db, report_id).await?;
    let answers = load_answers(&state.db, row.interview_id).await?;

    Ok(Json(answers))
}

/// DELETE /api/reports/:id
pub async fn handle_delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted: Option<(Uuid,)> =
        sqlx::query_as("DELETE FROM reports WHERE id = $1 RETURNING id")
            .bind(report_id)
            .fetch_optional(&state.db)
            .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Report not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_report(pool: &PgPool, report_id: Uuid) -> Result<ReportRow, AppError> {
    sqlx::query_as(
        r#"
        SELECT id, interview_id, feedback, assessment, achieved_level, score, created_at
        FROM reports
        WHERE id = $1
        "#,
    )
    .bind(report_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
}

async fn load_answers(pool: &PgPool, interview_id: Uuid) -> Result<Vec<AnswerRow>, AppError> {
    let answers = sqlx::query_as(
        r#"
        SELECT id, interview_id, question_id, user_answer, correct_answer, created_at
        FROM answers
        WHERE interview_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(interview_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}
