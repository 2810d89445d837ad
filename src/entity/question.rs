// src/entity/question.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

/// A quiz question as persisted in the record store.
///
/// A null `deleted_at` means the question is active; a timestamp means it
/// sits in the trash, hidden from active listings but still addressable
/// for restore or purge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub explanation: String,
    pub group_id: i64,
    pub level_id: i64,
    pub source_id: Option<i64>,
    pub difficulty: Difficulty,
    pub author: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The writable fields of a question, before the store has assigned an id.
///
/// Used both for creation and for edits: an edit overwrites the whole row
/// with the draft rather than patching individual columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub explanation: String,
    pub group_id: i64,
    pub level_id: i64,
    pub source_id: Option<i64>,
    pub difficulty: Difficulty,
    pub author: Option<String>,
    pub notes: Option<String>,
}

impl Question {
    /// Draft with this question's current values, for merge-then-overwrite edits.
    pub fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            text: self.text.clone(),
            explanation: self.explanation.clone(),
            group_id: self.group_id,
            level_id: self.level_id,
            source_id: self.source_id,
            difficulty: self.difficulty,
            author: self.author.clone(),
            notes: self.notes.clone(),
        }
    }
}
