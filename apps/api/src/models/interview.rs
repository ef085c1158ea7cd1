use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::question::{Difficulty, Question};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub difficulty_level: Difficulty,
    pub created_at: DateTime<Utc>,
}

/// API representation of an interview: the row plus its questions in order.
#[derive(Debug, Clone, Serialize)]
pub struct Interview {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub difficulty_level: Difficulty,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl Interview {
    pub fn from_row(row: InterviewRow, questions: Vec<Question>) -> Self {
        Interview {
            id: row.id,
            title: row.title,
            description: row.description,
            duration_minutes: row.duration_minutes,
            difficulty_level: row.difficulty_level,
            created_at: row.created_at,
            questions,
        }
    }
}

/// Payload for persisting an interview. Question ids are resolved against
/// the question store at persistence time; unresolvable ids are skipped.
#[derive(Debug, Clone)]
pub struct InterviewCreate {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub difficulty_level: Difficulty,
    pub question_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_id: Uuid,
    pub user_answer: String,
    pub correct_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerCreate {
    pub question_id: Uuid,
    pub user_answer: String,
    /// Caller-supplied reference answer; superseded by the evaluator's when
    /// a judgment exists for this question.
    #[serde(default)]
    pub correct_answer: Option<String>,
}
