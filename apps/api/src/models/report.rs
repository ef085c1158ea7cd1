use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::interview::AnswerRow;
use crate::models::question::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub feedback: String,
    pub assessment: String,
    pub achieved_level: Difficulty,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// API representation of a report: the row plus the interview's answers.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub feedback: String,
    pub assessment: String,
    pub achieved_level: Difficulty,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerRow>,
}

impl Report {
    pub fn from_row(row: ReportRow, answers: Vec<AnswerRow>) -> Self {
        Report {
            id: row.id,
            interview_id: row.interview_id,
            feedback: row.feedback,
            assessment: row.assessment,
            achieved_level: row.achieved_level,
            score: row.score,
            created_at: row.created_at,
            answers,
        }
    }
}
