//! Answer Evaluator — scores submitted answers and re-associates the
//! provider's judgments with question identifiers.
//!
//! Flow: pair answers to questions by id → serialize one block per pair →
//! adapter call for `InterviewEvaluation` → key judgments by their echoed
//! `question_id`. A submitted answer with no matching question is dropped
//! from the evaluation input; the submitted/paired counts on the report
//! make that gap visible to the caller.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::ai::interview_gen::CandidateQuestion;
use crate::ai::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use crate::ai::schema::{AnswerJudgment, InterviewEvaluation};
use crate::llm_client::{call_json, Completion};
use crate::models::question::Difficulty;

/// A submitted answer, identified by the question it responds to.
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question_id: String,
    pub user_answer: String,
}

/// A (question, answer) pair that survived id matching.
#[derive(Debug, Clone)]
struct QaPair {
    question_id: String,
    question: String,
    answer: String,
    difficulty_level: Difficulty,
    tags: Vec<String>,
}

/// The evaluator's result: the provider evaluation, the id-keyed judgment
/// map derived from it, and the pairing counts.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub evaluation: InterviewEvaluation,
    pub by_question: HashMap<String, AnswerJudgment>,
    pub answers_submitted: usize,
    pub answers_paired: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Evaluates the submitted answers against the interview's questions.
///
/// On any provider failure the report carries a sentinel evaluation
/// (score 0, empty judgments); the pairing counts are preserved either way.
pub async fn evaluate_answers(
    questions: &[CandidateQuestion],
    answers: &[AnswerInput],
    llm: &dyn Completion,
) -> EvaluationReport {
    let pairs = pair_answers(questions, answers);

    if pairs.len() < answers.len() {
        warn!(
            "{} of {} submitted answers matched no question and were dropped from evaluation",
            answers.len() - pairs.len(),
            answers.len()
        );
    }

    let prompt = EVALUATION_PROMPT_TEMPLATE.replace("{qa_block}", &build_qa_block(&pairs));

    let evaluation = match call_json::<InterviewEvaluation>(llm, &prompt, EVALUATION_SYSTEM).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            warn!("Answer evaluation failed: {e}");
            return EvaluationReport {
                evaluation: evaluation_error_sentinel(),
                by_question: HashMap::new(),
                answers_submitted: answers.len(),
                answers_paired: pairs.len(),
            };
        }
    };

    let (evaluation, by_question) = associate_judgments(evaluation, &pairs);

    EvaluationReport {
        evaluation,
        by_question,
        answers_submitted: answers.len(),
        answers_paired: pairs.len(),
    }
}

fn evaluation_error_sentinel() -> InterviewEvaluation {
    InterviewEvaluation {
        feedback: "Could not evaluate answers due to a technical error.".to_string(),
        assessment: "Error processing answers.".to_string(),
        achieved_level: Difficulty::Junior,
        score: 0,
        answer_evaluations: Vec::new(),
    }
}

/// Matches each submitted answer to the question with the same identifier.
/// Unmatched answers produce no pair.
fn pair_answers(questions: &[CandidateQuestion], answers: &[AnswerInput]) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    for answer in answers {
        match questions.iter().find(|q| q.id == answer.question_id) {
            Some(question) => pairs.push(QaPair {
                question_id: question.id.clone(),
                question: question.text.clone(),
                answer: answer.user_answer.clone(),
                difficulty_level: question.difficulty_level,
                tags: question.tags.clone(),
            }),
            None => warn!(
                "Answer references unknown question id {}; skipping",
                answer.question_id
            ),
        }
    }
    pairs
}

fn build_qa_block(pairs: &[QaPair]) -> String {
    let mut block = String::from("Questions and answers:\n");
    for pair in pairs {
        block.push_str(&format!(
            "Question ID: {}\nQuestion: {}\nDifficulty: {}\nTags: {}\nAnswer: {}\n\n",
            pair.question_id,
            pair.question,
            pair.difficulty_level,
            pair.tags.join(", "),
            pair.answer
        ));
    }
    block
}

/// Builds the question-id -> judgment map from each judgment's echoed
/// `question_id`, keeping only ids that were actually paired. The judgment
/// sequence itself is truncated so it never exceeds the pair count.
fn associate_judgments(
    mut evaluation: InterviewEvaluation,
    pairs: &[QaPair],
) -> (InterviewEvaluation, HashMap<String, AnswerJudgment>) {
    if evaluation.answer_evaluations.len() > pairs.len() {
        warn!(
            "Provider returned {} judgments for {} pairs; truncating",
            evaluation.answer_evaluations.len(),
            pairs.len()
        );
        evaluation.answer_evaluations.truncate(pairs.len());
    }

    let paired_ids: HashSet<&str> = pairs.iter().map(|p| p.question_id.as_str()).collect();

    let mut by_question = HashMap::new();
    for judgment in &evaluation.answer_evaluations {
        if paired_ids.contains(judgment.question_id.as_str()) {
            by_question.insert(judgment.question_id.clone(), judgment.clone());
        } else {
            warn!(
                "Judgment references question id {} that was never paired; ignoring",
                judgment.question_id
            );
        }
    }

    (evaluation, by_question)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
