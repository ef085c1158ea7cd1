// All LLM prompt constants for the AI services. Each template embeds the
// exact JSON shape expected back; `{placeholder}` slots are filled with
// `str::replace` before sending.

/// System prompt for question generation — enforces JSON-only output.
pub const QUESTION_GEN_SYSTEM: &str =
    "You are an AI assistant specializing in creating questions for technical interviews. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Question generation prompt template. Replace `{source_text}` before sending.
pub const QUESTION_GEN_PROMPT_TEMPLATE: &str = r#"Based on the provided text, create a list of 5 or more interview questions.
The text may include recommendations from previous interviews that should be considered when creating questions.

Return a JSON object with this EXACT schema (no extra fields):
{
  "questions": [
    {
      "text": "What does ownership mean in Rust?",
      "tags": ["rust", "memory management"],
      "difficulty_level": "middle"
    }
  ]
}

For each question determine:
1. The question text
2. Tags (technologies, concepts)
3. The difficulty level: exactly one of "junior", "middle", "senior"

TEXT:
{source_text}"#;

/// System prompt for interview composition — enforces JSON-only output.
pub const INTERVIEW_COMPOSE_SYSTEM: &str =
    "You are an AI assistant specializing in creating scenarios for technical interviews. \
    You are given an interview request and a list of available questions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Interview composition prompt template.
/// Replace: {request}, {tag_filter}, {questions_block}
pub const INTERVIEW_COMPOSE_PROMPT_TEMPLATE: &str = r#"Create an interview scenario by selecting appropriate questions from the available list.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Backend engineer screening",
  "description": "Covers HTTP fundamentals and SQL.",
  "duration_minutes": 60,
  "difficulty_level": "middle",
  "question_ids": ["use the exact ID values from the available questions"]
}

Determine:
1. The interview title
2. A description
3. The approximate duration in minutes
4. The difficulty level: exactly one of "junior", "middle", "senior"
5. The list of selected question IDs (only IDs that appear below)

Interview creation request: {request}

{tag_filter}

{questions_block}"#;

/// System prompt for answer evaluation — enforces JSON-only output.
pub const EVALUATION_SYSTEM: &str =
    "You are an AI expert in evaluating technical interviews. \
    Analyze the candidate's answers to the questions and evaluate them. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Answer evaluation prompt template. Replace `{qa_block}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate's answers below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "feedback": "General feedback on all answers.",
  "assessment": "Detailed assessment of the interview.",
  "achieved_level": "middle",
  "score": 70,
  "answer_evaluations": [
    {
      "question_id": "the exact Question ID value from the pair being judged",
      "correctness": "correct",
      "comment": "Detailed feedback on this answer.",
      "correct_answer": "A correct and complete answer to the question."
    }
  ]
}

Rules:
1. Produce exactly one evaluation per question/answer pair below, in any order.
2. Every evaluation MUST echo the pair's Question ID verbatim in `question_id`.
3. `correctness` is exactly one of "correct", "partially_correct", "incorrect".
4. `achieved_level` is exactly one of "junior", "middle", "senior".
5. `score` is an integer from 0 to 100.

{qa_block}"#;
