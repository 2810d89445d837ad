// src/entity/answer.rs
use serde::{Deserialize, Serialize};

/// One answer option belonging to a question.
///
/// Convention upheld on every write (not enforced by the store): a question
/// has exactly four answers and exactly one of them is flagged correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// An answer option before the store has assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub text: String,
    pub is_correct: bool,
}
