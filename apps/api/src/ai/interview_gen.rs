//! Interview Composer — selects and frames known questions into an
//! interview scenario.

use tracing::warn;

use crate::ai::prompts::{INTERVIEW_COMPOSE_PROMPT_TEMPLATE, INTERVIEW_COMPOSE_SYSTEM};
use crate::ai::schema::GeneratedInterview;
use crate::llm_client::{call_json, Completion};
use crate::models::question::Difficulty;

/// A persisted question offered to the composer as selection material.
#[derive(Debug, Clone)]
pub struct CandidateQuestion {
    pub id: String,
    pub text: String,
    pub tags: Vec<String>,
    pub difficulty_level: Difficulty,
}

/// Composes an interview from the request text and the candidate questions.
///
/// The tag filter is only mentioned in the instruction; filtering the
/// candidate list by tag is the caller's responsibility. On any provider
/// failure a sentinel interview is returned, recognizable by its fixed
/// "Interview Creation Error" title.
pub async fn compose_interview(
    request_text: &str,
    tag_name: Option<&str>,
    candidates: &[CandidateQuestion],
    llm: &dyn Completion,
) -> GeneratedInterview {
    let prompt = build_compose_prompt(request_text, tag_name, candidates);

    match call_json::<GeneratedInterview>(llm, &prompt, INTERVIEW_COMPOSE_SYSTEM).await {
        Ok(interview) => interview,
        Err(e) => {
            warn!("Interview composition failed: {e}");
            creation_error_interview()
        }
    }
}

fn creation_error_interview() -> GeneratedInterview {
    GeneratedInterview {
        title: "Interview Creation Error".to_string(),
        description: "Failed to process request".to_string(),
        duration_minutes: 30,
        difficulty_level: Difficulty::Middle,
        question_ids: Vec::new(),
    }
}

pub(crate) fn build_compose_prompt(
    request_text: &str,
    tag_name: Option<&str>,
    candidates: &[CandidateQuestion],
) -> String {
    let tag_filter = match tag_name {
        Some(tag) => format!("The interview is for tag '{tag}'."),
        None => String::new(),
    };

    INTERVIEW_COMPOSE_PROMPT_TEMPLATE
        .replace("{request}", request_text)
        .replace("{tag_filter}", &tag_filter)
        .replace("{questions_block}", &build_questions_block(candidates))
}

/// One readable block per candidate, the shape the evaluation prompts use
/// as well: ID / Question / Tags / Difficulty.
fn build_questions_block(candidates: &[CandidateQuestion]) -> String {
    let mut block = String::from("Available questions:\n");
    for q in candidates {
        block.push_str(&format!(
            "ID: {}\nQuestion: {}\nTags: {}\nDifficulty: {}\n\n",
            q.id,
            q.text,
            q.tags.join(", "),
            q.difficulty_level
        ));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct CannedCompletion(&'static str);

    #[async_trait]
    impl Completion for CannedCompletion {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl Completion for FailingCompletion {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 429,
                message: "rate limited".to_string(),
            })
        }
    }

    fn candidates() -> Vec<CandidateQuestion> {
        vec![
            CandidateQuestion {
                id: "6f1a".to_string(),
                text: "What is a REST API?".to_string(),
                tags: vec!["rest".to_string(), "http".to_string()],
                difficulty_level: Difficulty::Junior,
            },
            CandidateQuestion {
                id: "9b2c".to_string(),
                text: "Explain connection pooling.".to_string(),
                tags: vec!["databases".to_string()],
                difficulty_level: Difficulty::Middle,
            },
        ]
    }

    #[tokio::test]
    async fn well_formed_response_passes_through_unchanged() {
        let llm = CannedCompletion(
            r#"{
                "title": "REST screening",
                "description": "HTTP basics",
                "duration_minutes": 40,
                "difficulty_level": "junior",
                "question_ids": ["6f1a"]
            }"#,
        );
        let interview = compose_interview("a junior screening", None, &candidates(), &llm).await;

        assert_eq!(interview.title, "REST screening");
        assert_eq!(interview.duration_minutes, 40);
        assert_eq!(interview.question_ids, vec!["6f1a"]);
    }

    #[tokio::test]
    async fn provider_failure_yields_sentinel_interview() {
        let interview =
            compose_interview("a junior screening", None, &candidates(), &FailingCompletion).await;

        assert_eq!(interview.title, "Interview Creation Error");
        assert_eq!(interview.description, "Failed to process request");
        assert_eq!(interview.duration_minutes, 30);
        assert_eq!(interview.difficulty_level, Difficulty::Middle);
        assert!(interview.question_ids.is_empty());
    }

    #[tokio::test]
    async fn malformed_response_yields_sentinel_interview() {
        let interview = compose_interview(
            "a junior screening",
            None,
            &candidates(),
            &CannedCompletion("```oops"),
        )
        .await;
        assert_eq!(interview.title, "Interview Creation Error");
    }

    #[test]
    fn prompt_serializes_each_candidate_block() {
        let prompt = build_compose_prompt("screening", None, &candidates());

        assert!(prompt.contains("ID: 6f1a"));
        assert!(prompt.contains("Question: Explain connection pooling."));
        assert!(prompt.contains("Tags: rest, http"));
        assert!(prompt.contains("Difficulty: middle"));
        assert!(prompt.contains("Interview creation request: screening"));
    }

    #[test]
    fn prompt_mentions_tag_filter_when_present() {
        let with_tag = build_compose_prompt("screening", Some("rust"), &candidates());
        assert!(with_tag.contains("for tag 'rust'"));

        let without_tag = build_compose_prompt("screening", None, &candidates());
        assert!(!without_tag.contains("for tag"));
    }
}
