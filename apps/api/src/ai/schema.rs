//! Schemas for LLM output. Each record is validated by serde on the way in:
//! unknown enum tokens and out-of-range scores fail parsing, which the
//! adapter reports as a schema-validation failure.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::question::Difficulty;

/// A generated interview question, not yet persisted (no identifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub text: String,
    pub tags: Vec<String>,
    pub difficulty_level: Difficulty,
}

/// Wrapper for a list of generated questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionList {
    pub questions: Vec<GeneratedQuestion>,
}

/// A composed interview scenario. `question_ids` are opaque strings here;
/// the persistence layer resolves them against the question store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedInterview {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub difficulty_level: Difficulty,
    pub question_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

/// Per-answer verdict. The provider echoes back the `question_id` of the
/// pair it judged; the evaluator keys its mapping on that echo instead of
/// sequence position, so reordering cannot misattribute a judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerJudgment {
    pub question_id: String,
    pub correctness: Correctness,
    pub comment: String,
    pub correct_answer: String,
}

/// Overall interview evaluation returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewEvaluation {
    pub feedback: String,
    pub assessment: String,
    pub achieved_level: Difficulty,
    #[serde(deserialize_with = "de_score")]
    pub score: u8,
    pub answer_evaluations: Vec<AnswerJudgment>,
}

/// Score must be an integer in [0, 100]; anything else is a validation
/// failure, not coerced.
fn de_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(serde::de::Error::custom(format!(
            "score {value} is outside the range 0..=100"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation_json(score: i64) -> String {
        format!(
            r#"{{
                "feedback": "Solid fundamentals.",
                "assessment": "Knows REST, weak on caching.",
                "achieved_level": "middle",
                "score": {score},
                "answer_evaluations": []
            }}"#
        )
    }

    #[test]
    fn question_list_deserializes() {
        let json = r#"{
            "questions": [
                {"text": "What is a REST API?", "tags": ["rest", "http"], "difficulty_level": "junior"},
                {"text": "Design an idempotent PUT.", "tags": ["rest"], "difficulty_level": "senior"}
            ]
        }"#;
        let list: QuestionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.questions.len(), 2);
        assert_eq!(list.questions[0].difficulty_level, Difficulty::Junior);
        assert_eq!(list.questions[1].tags, vec!["rest"]);
    }

    #[test]
    fn question_rejects_unknown_difficulty() {
        let json = r#"{"text": "q", "tags": [], "difficulty_level": "principal"}"#;
        assert!(serde_json::from_str::<GeneratedQuestion>(json).is_err());
    }

    #[test]
    fn generated_interview_deserializes() {
        let json = r#"{
            "title": "Backend basics",
            "description": "HTTP and SQL fundamentals",
            "duration_minutes": 45,
            "difficulty_level": "middle",
            "question_ids": ["a", "b"]
        }"#;
        let interview: GeneratedInterview = serde_json::from_str(json).unwrap();
        assert_eq!(interview.duration_minutes, 45);
        assert_eq!(interview.question_ids.len(), 2);
    }

    #[test]
    fn correctness_parses_snake_case_tokens() {
        let c: Correctness = serde_json::from_str(r#""partially_correct""#).unwrap();
        assert_eq!(c, Correctness::PartiallyCorrect);
        assert!(serde_json::from_str::<Correctness>(r#""partially correct""#).is_err());
    }

    #[test]
    fn judgment_requires_question_id() {
        let json = r#"{"correctness": "correct", "comment": "ok", "correct_answer": "42"}"#;
        assert!(serde_json::from_str::<AnswerJudgment>(json).is_err());
    }

    #[test]
    fn score_boundaries_are_inclusive() {
        let eval: InterviewEvaluation = serde_json::from_str(&evaluation_json(0)).unwrap();
        assert_eq!(eval.score, 0);
        let eval: InterviewEvaluation = serde_json::from_str(&evaluation_json(100)).unwrap();
        assert_eq!(eval.score, 100);
    }

    #[test]
    fn score_out_of_range_fails_validation() {
        assert!(serde_json::from_str::<InterviewEvaluation>(&evaluation_json(-1)).is_err());
        assert!(serde_json::from_str::<InterviewEvaluation>(&evaluation_json(101)).is_err());
    }

    #[test]
    fn evaluation_rejects_unknown_achieved_level() {
        let json = r#"{
            "feedback": "f",
            "assessment": "a",
            "achieved_level": "staff",
            "score": 50,
            "answer_evaluations": []
        }"#;
        assert!(serde_json::from_str::<InterviewEvaluation>(json).is_err());
    }
}
