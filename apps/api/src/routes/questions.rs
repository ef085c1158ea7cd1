//! Axum route handlers for the Questions API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::ai::question_gen::generate_questions;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::question::{normalize_tag, Difficulty, Question, QuestionCreate, QuestionRow, TagRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionGenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionGenerateResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuestionsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
}

/// POST /api/questions/generate
///
/// Generates questions from a prompt via the LLM and persists each one.
/// An empty generation result is surfaced as 422, not an empty list.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionGenerateRequest>,
) -> Result<Json<QuestionGenerateResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    info!(
        "Generating questions from prompt: {}...",
        request.prompt.chars().take(50).collect::<String>()
    );

    let generated = generate_questions(&request.prompt, &state.llm).await;

    if generated.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Could not generate questions from the provided prompt".to_string(),
        ));
    }

    let mut questions = Vec::with_capacity(generated.len());
    for q in generated {
        let question = create_question(
            &state.db,
            &state.llm,
            QuestionCreate {
                text: q.text,
                difficulty_level: q.difficulty_level,
                tags: q.tags,
            },
        )
        .await?;
        questions.push(question);
    }

    info!("Persisted {} generated questions", questions.len());

    Ok(Json(QuestionGenerateResponse { questions }))
}

/// GET /api/questions
///
/// Lists questions, optionally filtered by difficulty and/or tag.
/// The tag filter is normalized before comparison.
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let tag = params.tag.as_deref().map(normalize_tag);

    let rows: Vec<QuestionRow> = sqlx::query_as(
        r#"
        SELECT DISTINCT q.id, q.text, q.difficulty_level, q.created_at
        FROM questions q
        LEFT JOIN question_tags qt ON qt.question_id = q.id
        LEFT JOIN tags t ON t.id = qt.tag_id
        WHERE ($1::text IS NULL OR t.name = $1)
          AND ($2::difficulty_level IS NULL OR q.difficulty_level = $2)
        ORDER BY q.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(tag)
    .bind(params.difficulty)
    .bind(params.limit.unwrap_or(100))
    .bind(params.skip.unwrap_or(0))
    .fetch_all(&state.db)
    .await?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = load_tags(&state.db, row.id).await?;
        questions.push(Question::from_row(row, tags));
    }

    Ok(Json(questions))
}

/// GET /api/questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
) -> Result<Json<Question>, AppError> {
    let row: QuestionRow = sqlx::query_as(
        "SELECT id, text, difficulty_level, created_at FROM questions WHERE id = $1",
    )
    .bind(question_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    let tags = load_tags(&state.db, row.id).await?;

    Ok(Json(Question::from_row(row, tags)))
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence helpers
// ────────────────────────────────────────────────────────────────────────────

/// Persists a question: embeds the text, inserts the row, then links each
/// normalized tag (creating tags that do not exist yet). Tags that
/// normalize to the empty string are discarded.
pub(crate) async fn create_question(
    pool: &PgPool,
    llm: &LlmClient,
    question: QuestionCreate,
) -> Result<Question, AppError> {
    let embedding = llm
        .embed(&question.text)
        .await
        .map_err(|e| AppError::Llm(format!("Embedding failed: {e}")))?;

    let mut tx = pool.begin().await?;

    let row: QuestionRow = sqlx::query_as(
        r#"
        INSERT INTO questions (id, text, difficulty_level, vector_embedding, created_at)
        VALUES ($1, $2, $3, $4, now())
        RETURNING id, text, difficulty_level, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&question.text)
    .bind(question.difficulty_level)
    .bind(&embedding)
    .fetch_one(&mut *tx)
    .await?;

    let mut tags: Vec<TagRow> = Vec::new();
    for raw_tag in &question.tags {
        let name = normalize_tag(raw_tag);
        if name.is_empty() || tags.iter().any(|t| t.name == name) {
            continue;
        }

        let existing: Option<TagRow> =
            sqlx::query_as("SELECT id, name, description FROM tags WHERE name = $1")
                .bind(&name)
                .fetch_optional(&mut *tx)
                .await?;

        let tag = match existing {
            Some(tag) => tag,
            None => {
                sqlx::query_as(
                    "INSERT INTO tags (id, name) VALUES ($1, $2) RETURNING id, name, description",
                )
                .bind(Uuid::new_v4())
                .bind(&name)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query("INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2)")
            .bind(row.id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await?;

        tags.push(tag);
    }

    tx.commit().await?;

    Ok(Question::from_row(row, tags))
}

/// Loads the tags linked to a question.
pub(crate) async fn load_tags(pool: &PgPool, question_id: Uuid) -> Result<Vec<TagRow>, AppError> {
    let tags = sqlx::query_as(
        r#"
        SELECT t.id, t.name, t.description
        FROM tags t
        JOIN question_tags qt ON qt.tag_id = t.id
        WHERE qt.question_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
