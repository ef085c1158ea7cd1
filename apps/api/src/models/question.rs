use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Difficulty level shared by questions, interviews and reports.
/// Maps to the `difficulty_level` PostgreSQL enum; any other token from an
/// external source is a deserialization failure, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "difficulty_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Junior,
    Middle,
    Senior,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Junior => "junior",
            Difficulty::Middle => "middle",
            Difficulty::Senior => "senior",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical tag form: lower-cased and trimmed. Callers discard tags that
/// normalize to the empty string.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCreate {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub text: String,
    pub difficulty_level: Difficulty,
    pub created_at: DateTime<Utc>,
}

/// API representation of a question: the row plus its tags.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub difficulty_level: Difficulty,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<TagRow>,
}

impl Question {
    pub fn from_row(row: QuestionRow, tags: Vec<TagRow>) -> Self {
        Question {
            id: row.id,
            text: row.text,
            difficulty_level: row.difficulty_level,
            created_at: row.created_at,
            tags,
        }
    }
}

/// Payload for persisting a question, either user-supplied or produced by
/// the question generator.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionCreate {
    pub text: String,
    pub difficulty_level: Difficulty,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tag_lowercases_and_trims() {
        assert_eq!(normalize_tag(" Go "), "go");
        assert_eq!(normalize_tag("PostgreSQL"), "postgresql");
        assert_eq!(normalize_tag("rest apis"), "rest apis");
    }

    #[test]
    fn normalize_tag_is_idempotent() {
        let once = normalize_tag("  Distributed Systems ");
        assert_eq!(normalize_tag(&once), once);
    }

    #[test]
    fn normalize_tag_whitespace_only_becomes_empty() {
        assert_eq!(normalize_tag("   "), "");
    }

    #[test]
    fn difficulty_parses_known_levels() {
        let d: Difficulty = serde_json::from_str(r#""junior""#).unwrap();
        assert_eq!(d, Difficulty::Junior);
        let d: Difficulty = serde_json::from_str(r#""senior""#).unwrap();
        assert_eq!(d, Difficulty::Senior);
    }

    #[test]
    fn difficulty_rejects_unknown_levels() {
        assert!(serde_json::from_str::<Difficulty>(r#""expert""#).is_err());
        assert!(serde_json::from_str::<Difficulty>(r#""Junior""#).is_err());
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Middle).unwrap(),
            r#""middle""#
        );
    }
}
