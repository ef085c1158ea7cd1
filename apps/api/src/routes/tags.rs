//! Axum route handlers for the Tags API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::question::{normalize_tag, Question, QuestionRow, TagCreate, TagRow};
use crate::routes::questions::load_tags;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<TagRow>>, AppError> {
    let tags: Vec<TagRow> =
        sqlx::query_as("SELECT id, name, description FROM tags ORDER BY name LIMIT $1 OFFSET $2")
            .bind(params.limit.unwrap_or(100))
            .bind(params.skip.unwrap_or(0))
            .fetch_all(&state.db)
            .await?;

    Ok(Json(tags))
}

/// GET /api/tags/:id
pub async fn handle_get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
) -> Result<Json<TagRow>, AppError> {
    let tag: TagRow = sqlx::query_as("SELECT id, name, description FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(Json(tag))
}

/// GET /api/tags/:id/questions
///
/// Lists the questions linked to a tag.
pub async fn handle_tag_questions(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let tag: Option<TagRow> = sqlx::query_as("SELECT id, name, description FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(&state.db)
        .await?;

    if tag.is_none() {
        return Err(AppError::NotFound("Tag not found".to_string()));
    }

    let rows: Vec<QuestionRow> = sqlx::query_as(
        r#"
        SELECT q.id, q.text, q.difficulty_level, q.created_at
        FROM questions q
        JOIN question_tags qt ON qt.question_id = q.id
        WHERE qt.tag_id = $1
        ORDER BY q.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(tag_id)
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

/// POST /api/tags
///
/// Creates a tag. Names are stored normalized; duplicates are rejected.
pub async fn handle_create_tag(
    State(state): State<AppState>,
    Json(request): Json<TagCreate>,
) -> Result<(StatusCode, Json<TagRow>), AppError> {
    let name = normalize_tag(&request.name);
    if name.is_empty() {
        return Err(AppError::Validation("Tag name cannot be empty".to_string()));
    }

    let existing: Option<TagRow> =
        sqlx::query_as("SELECT id, name, description FROM tags WHERE LOWER(name) = $1")
            .bind(&name)
            .fetch_optional(&state.db)
            .await?;

    if existing.is_some() {
        return Err(AppError::Validation("Tag already exists".to_string()));
    }

    let tag: TagRow = sqlx::query_as(
        "INSERT INTO tags (id, name, description) VALUES ($1, $2, $3) RETURNING id, name, description",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&request.description)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}
