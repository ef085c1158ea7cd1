//! Question Generator — produces interview questions from free-form text.

use tracing::warn;

use crate::ai::prompts::{QUESTION_GEN_PROMPT_TEMPLATE, QUESTION_GEN_SYSTEM};
use crate::ai::schema::{GeneratedQuestion, QuestionList};
use crate::llm_client::{call_json, Completion};

/// Generates 5 or more interview questions from the given source text.
///
/// Returns an empty vec on any provider failure; callers treat empty as
/// "could not generate" and surface that themselves.
pub async fn generate_questions(
    source_text: &str,
    llm: &dyn Completion,
) -> Vec<GeneratedQuestion> {
    let prompt = QUESTION_GEN_PROMPT_TEMPLATE.replace("{source_text}", source_text);

    match call_json::<QuestionList>(llm, &prompt, QUESTION_GEN_SYSTEM).await {
        Ok(list) => list.questions,
        Err(e) => {
            warn!("Question generation failed: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::question::Difficulty;
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
            Err(LlmError::EmptyContent)
        }
    }

    const FIVE_QUESTIONS: &str = r#"{
        "questions": [
            {"text": "What is a REST API?", "tags": ["rest", "http"], "difficulty_level": "junior"},
            {"text": "Explain statelessness in REST.", "tags": ["rest"], "difficulty_level": "junior"},
            {"text": "When would you use PATCH over PUT?", "tags": ["rest", "http"], "difficulty_level": "middle"},
            {"text": "How do you version a public REST API?", "tags": ["rest", "api design"], "difficulty_level": "middle"},
            {"text": "Design rate limiting for a REST gateway.", "tags": ["rest", "scalability"], "difficulty_level": "senior"}
        ]
    }"#;

    #[tokio::test]
    async fn well_formed_response_yields_all_questions() {
        let questions = generate_questions("Explain REST APIs", &CannedCompletion(FIVE_QUESTIONS)).await;

        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert!(!q.text.is_empty());
            assert!(!q.tags.is_empty());
        }
        assert_eq!(questions[4].difficulty_level, Difficulty::Senior);
    }

    #[tokio::test]
    async fn provider_failure_yields_empty_vec() {
        let questions = generate_questions("Explain REST APIs", &FailingCompletion).await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn malformed_response_yields_empty_vec() {
        let questions =
            generate_questions("Explain REST APIs", &CannedCompletion("not json at all")).await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn nonconforming_response_yields_empty_vec() {
        // valid JSON, wrong shape
        let questions =
            generate_questions("Explain REST APIs", &CannedCompletion(r#"{"items": []}"#)).await;
        assert!(questions.is_empty());
    }

    #[test]
    fn prompt_embeds_source_text() {
        let prompt = QUESTION_GEN_PROMPT_TEMPLATE.replace("{source_text}", "Explain REST APIs");
        assert!(prompt.contains("Explain REST APIs"));
        assert!(!prompt.contains("{source_text}"));
    }
}
