//! Axum route handlers for the Interviews API.
//!
//! Flow for generation: load candidate questions (optionally tag-filtered)
//! → compose via the LLM → persist, linking only question ids that resolve
//! against the store. Flow for submission: load the interview's questions →
//! evaluate answers via the LLM → upsert answer rows with the provider's
//! reference answers → insert the report.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::evaluation::{evaluate_answers, AnswerInput};
use crate::ai::interview_gen::{compose_interview, CandidateQuestion};
use crate::errors::AppError;
use crate::models::interview::{AnswerCreate, AnswerRow, Interview, InterviewCreate, InterviewRow};
use crate::models::question::{normalize_tag, Question, QuestionRow};
use crate::models::report::{Report, ReportRow};
use crate::routes::questions::load_tags;
use crate::routes::tags::PageQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewGenerateRequest {
    pub prompt: String,
    pub tag_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewSubmitRequest {
    pub answers: Vec<AnswerCreate>,
}

#[derive(Debug, Serialize)]
pub struct InterviewSubmitResponse {
    pub report: Report,
}

/// POST /api/interviews/generate
///
/// Generates an interview from a prompt and the stored questions.
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewGenerateRequest>,
) -> Result<Json<Interview>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let tag = request.tag_name.as_deref().map(normalize_tag);

    let rows: Vec<QuestionRow> = sqlx::query_as(
        r#"
        SELECT DISTINCT q.id, q.text, q.difficulty_level, q.created_at
        FROM questions q
        LEFT JOIN question_tags qt ON qt.question_id = q.id
        LEFT JOIN tags t ON t.id = qt.tag_id
        WHERE ($1::text IS NULL OR t.name = $1)
        ORDER BY q.created_at DESC
        "#,
    )
    .bind(&tag)
    .fetch_all(&state.db)
    .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound(
            "No questions found matching the request".to_string(),
        ));
    }

    let mut candidates = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = load_tags(&state.db, row.id).await?;
        candidates.push(CandidateQuestion {
            id: row.id.to_string(),
            text: row.text,
            tags: tags.into_iter().map(|t| t.name).collect(),
            difficulty_level: row.difficulty_level,
        });
    }

    let generated = compose_interview(
        &request.prompt,
        request.tag_name.as_deref(),
        &candidates,
        &state.llm,
    )
    .await;

    // Composer ids are opaque strings; anything that does not parse as a
    // UUID cannot resolve against the store and is skipped here.
    let question_ids: Vec<Uuid> = generated
        .question_ids
        .iter()
        .filter_map(|id| match Uuid::parse_str(id) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Composer returned unparseable question id {id:?}; skipping");
                None
            }
        })
        .collect();

    let interview = create_interview(
        &state.db,
        InterviewCreate {
            title: generated.title,
            description: Some(generated.description),
            duration_minutes: Some(generated.duration_minutes as i32),
            difficulty_level: generated.difficulty_level,
            question_ids,
        },
    )
    .await?;

    info!(
        "Generated interview {} with {} questions",
        interview.id,
        interview.questions.len()
    );

    Ok(Json(interview))
}

/// GET /api/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let rows: Vec<InterviewRow> = sqlx::query_as(
        r#"
        SELECT id, title, description, duration_minutes, difficulty_level, created_at
        FROM interviews
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit.unwrap_or(100))
    .bind(params.skip.unwrap_or(0))
    .fetch_all(&state.db)
    .await?;

    let mut interviews = Vec::with_capacity(rows.len());
    for row in rows {
        let questions = load_interview_questions(&state.db, row.id).await?;
        interviews.push(Interview::from_row(row, questions));
    }

    Ok(Json(interviews))
}

/// GET /api/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<Interview>, AppError> {
    let row = fetch_interview(&state.db, interview_id).await?;
    let questions = load_interview_questions(&state.db, row.id).await?;

    Ok(Json(Interview::from_row(row, questions)))
}

/// POST /api/interviews/:id/submit
///
/// Submits answers to an interview's questions and returns the evaluation
/// report. Answers for unknown question ids are dropped from the
/// evaluation input; the drop is logged and visible as a count mismatch
/// between submitted answers and returned judgments.
pub async fn handle_submit_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<InterviewSubmitRequest>,
) -> Result<Json<InterviewSubmitResponse>, AppError> {
    fetch_interview(&state.db, interview_id).await?;

    let questions = load_interview_questions(&state.db, interview_id).await?;

    let candidates: Vec<CandidateQuestion> = questions
        .iter()
        .map(|q| CandidateQuestion {
            id: q.id.to_string(),
            text: q.text.clone(),
            tags: q.tags.iter().map(|t| t.name.clone()).collect(),
            difficulty_level: q.difficulty_level,
        })
        .collect();

    let answer_inputs: Vec<AnswerInput> = request
        .answers
        .iter()
        .map(|a| AnswerInput {
            question_id: a.question_id.to_string(),
            user_answer: a.user_answer.clone(),
        })
        .collect();

    let report = evaluate_answers(&candidates, &answer_inputs, &state.llm).await;

    // Store each submitted answer, attaching the provider's reference
    // answer when one was judged for that question.
    for answer in &request.answers {
        let correct_answer = report
            .by_question
            .get(&answer.question_id.to_string())
            .map(|j| j.correct_answer.clone())
            .or_else(|| answer.correct_answer.clone());
        upsert_answer(&state.db, interview_id, answer, correct_answer).await?;
    }

    let report_row: ReportRow = sqlx::query_as(
        r#"
        INSERT INTO reports (id, interview_id, feedback, assessment, achieved_level, score, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        RETURNING id, interview_id, feedback, assessment, achieved_level, score, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(interview_id)
    .bind(&report.evaluation.feedback)
    .bind(&report.evaluation.assessment)
    .bind(report.evaluation.achieved_level)
    .bind(i32::from(report.evaluation.score))
    .fetch_one(&state.db)
    .await?;

    let answers: Vec<AnswerRow> =
        sqlx::query_as("SELECT * FROM answers WHERE interview_id = $1 ORDER BY created_at")
            .bind(interview_id)
            .fetch_all(&state.db)
            .await?;

    info!(
        "Evaluated interview {}: score {}, {}/{} answers judged",
        interview_id,
        report.evaluation.score,
        report.evaluation.answer_evaluations.len(),
        report.answers_submitted
    );

    Ok(Json(InterviewSubmitResponse {
        report: Report::from_row(report_row, answers),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence helpers
// ────────────────────────────────────────────────────────────────────────────

async fn fetch_interview(pool: &PgPool, interview_id: Uuid) -> Result<InterviewRow, AppError> {
    sqlx::query_as(
        r#"
        SELECT id, title, description, duration_minutes, difficulty_level, created_at
        FROM interviews
        WHERE id = $1
        "#,
    )
    .bind(interview_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))
}

/// Persists an interview and links its questions in order. Ids that do not
/// resolve against the question store are skipped.
pub(crate) async fn create_interview(
    pool: &PgPool,
    interview: InterviewCreate,
) -> Result<Interview, AppError> {
    let mut tx = pool.begin().await?;

    let row: InterviewRow = sqlx::query_as(
        r#"
        INSERT INTO interviews (id, title, description, duration_minutes, difficulty_level, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        RETURNING id, title, description, duration_minutes, difficulty_level, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&interview.title)
    .bind(&interview.description)
    .bind(interview.duration_minutes)
    .bind(interview.difficulty_level)
    .fetch_one(&mut *tx)
    .await?;

    let mut order_num = 1i32;
    for question_id in &interview.question_ids {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            warn!("Interview references unknown question {question_id}; skipping");
            continue;
        }

        sqlx::query(
            "INSERT INTO interview_questions (interview_id, question_id, order_num) VALUES ($1, $2, $3)",
        )
        .bind(row.id)
        .bind(question_id)
        .bind(order_num)
        .execute(&mut *tx)
        .await?;

        order_num += 1;
    }

    tx.commit().await?;

    let questions = load_interview_questions(pool, row.id).await?;

    Ok(Interview::from_row(row, questions))
}

/// Loads an interview's questions in their stored order.
pub(crate) async fn load_interview_questions(
    pool: &PgPool,
    interview_id: Uuid,
) -> Result<Vec<Question>, AppError> {
    let rows: Vec<QuestionRow> = sqlx::query_as(
        r#"
        SELECT q.id, q.text, q.difficulty_level, q.created_at
        FROM questions q
        JOIN interview_questions iq ON iq.question_id = q.id
        WHERE iq.interview_id = $1
        ORDER BY iq.order_num
        "#,
    )
    .bind(interview_id)
    .fetch_all(pool)
    .await?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = load_tags(pool, row.id).await?;
        questions.push(Question::from_row(row, tags));
    }

    Ok(questions)
}

/// Updates the stored answer for (interview, question) or inserts a new one.
async fn upsert_answer(
    pool: &PgPool,
    interview_id: Uuid,
    answer: &AnswerCreate,
    correct_answer: Option<String>,
) -> Result<(), AppError> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM answers WHERE interview_id = $1 AND question_id = $2")
            .bind(interview_id)
            .bind(answer.question_id)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((answer_id,)) => {
            sqlx::query("UPDATE answers SET user_answer = $1, correct_answer = $2 WHERE id = $3")
                .bind(&answer.user_answer)
                .bind(&correct_answer)
                .bind(answer_id)
                .execute(pool)
                .await?;
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO answers (id, interview_id, question_id, user_answer, correct_answer, created_at)
                VALUES ($1, $2, $3, $4, $5, now())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(interview_id)
            .bind(answer.question_id)
            .bind(&answer.user_answer)
            .bind(&correct_answer)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}
