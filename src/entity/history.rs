// src/entity/history.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Answer, Difficulty, Question};

/// What happened to the question when a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    #[default]
    Update,
    Delete,
    Restore,
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryAction::Update => write!(f, "update"),
            HistoryAction::Delete => write!(f, "delete"),
            HistoryAction::Restore => write!(f, "restore"),
        }
    }
}

impl std::str::FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "update" => Ok(HistoryAction::Update),
            "delete" => Ok(HistoryAction::Delete),
            "restore" => Ok(HistoryAction::Restore),
            _ => Err(format!("Invalid history action: {}", s)),
        }
    }
}

/// An answer as embedded inside a history snapshot.
///
/// Stored as a nested value on the history row, not foreign-keyed: the live
/// answer rows are replaced wholesale on edit, so their ids carry no meaning
/// across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    pub text: String,
    pub is_correct: bool,
}

/// A persisted history row: one prior version of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub explanation: String,
    pub group_id: i64,
    pub level_id: i64,
    pub source_id: Option<i64>,
    pub difficulty: Difficulty,
    pub answers: Vec<AnswerSnapshot>,
    pub action: HistoryAction,
    pub changed_at: DateTime<Utc>,
}

/// A history row before the store has assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub question_id: i64,
    pub text: String,
    pub explanation: String,
    pub group_id: i64,
    pub level_id: i64,
    pub source_id: Option<i64>,
    pub difficulty: Difficulty,
    pub answers: Vec<AnswerSnapshot>,
    pub action: HistoryAction,
    pub changed_at: DateTime<Utc>,
}

impl HistorySnapshot {
    /// Capture the current persisted state of a question and its answers,
    /// stamped with the given action and the current time.
    pub fn capture(question: &Question, answers: &[Answer], action: HistoryAction) -> Self {
        Self {
            question_id: question.id,
            text: question.text.clone(),
            explanation: question.explanation.clone(),
            group_id: question.group_id,
            level_id: question.level_id,
            source_id: question.source_id,
            difficulty: question.difficulty,
            answers: answers
                .iter()
                .map(|a| AnswerSnapshot {
                    text: a.text.clone(),
                    is_correct: a.is_correct,
                })
                .collect(),
            action,
            changed_at: Utc::now(),
        }
    }
}
