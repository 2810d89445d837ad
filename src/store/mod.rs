//! Record store gateway.
//!
//! The lifecycle core talks to the backing tables only through the
//! [`RecordStore`] trait, constructed once at startup and passed by
//! reference to every component. [`SqliteStore`] is the bundled
//! implementation; reference-entity CRUD and listing queries live on it
//! directly since no policy depends on them.

mod sqlite_store;

pub use sqlite_store::SqliteStore;

use chrono::{DateTime, Utc};

use crate::entity::{Answer, AnswerDraft, HistoryEntry, HistorySnapshot, Question, QuestionDraft};
use crate::error::Result;

/// Which lifecycle state a question listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionState {
    /// `deleted_at` is null. Listed newest first by id.
    #[default]
    Active,
    /// `deleted_at` is set. Listed most recently trashed first.
    Deleted,
}

/// Filter for question listings.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub state: QuestionState,
    /// Restrict to one topic group.
    pub group_id: Option<i64>,
    /// Case-insensitive substring match on the question text.
    pub search: Option<String>,
}

impl QuestionFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn deleted() -> Self {
        Self {
            state: QuestionState::Deleted,
            ..Self::default()
        }
    }
}

/// Table operations the lifecycle core requires of the backing store.
///
/// Every call is a single round trip; there are no transactions spanning
/// calls, so callers own any ordering guarantees they need. Failures carry
/// a human-readable message and are never retried here.
pub trait RecordStore {
    /// Fetch one question, trashed or not.
    fn question(&self, id: i64) -> Result<Option<Question>>;
    fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>>;
    /// Insert a question row and return it with its assigned id.
    fn insert_question(&self, draft: &QuestionDraft) -> Result<Question>;
    /// Overwrite every writable column of an existing row. Errors if the
    /// question does not exist.
    fn update_question(&self, id: i64, draft: &QuestionDraft) -> Result<()>;
    /// Set or clear the trash marker. Errors if the question does not exist.
    fn set_deleted_at(&self, id: i64, deleted_at: Option<DateTime<Utc>>) -> Result<()>;
    /// Remove the question row itself.
    fn delete_question(&self, id: i64) -> Result<()>;

    /// Answers for a question, in insertion order.
    fn answers_for(&self, question_id: i64) -> Result<Vec<Answer>>;
    fn insert_answers(&self, question_id: i64, answers: &[AnswerDraft]) -> Result<()>;
    fn delete_answers(&self, question_id: i64) -> Result<()>;

    fn insert_history(&self, snapshot: &HistorySnapshot) -> Result<()>;
    /// History entries for a question, newest change first.
    fn history_for(&self, question_id: i64) -> Result<Vec<HistoryEntry>>;
    /// History row ids for a question, newest change first.
    fn history_ids(&self, question_id: i64) -> Result<Vec<i64>>;
    fn delete_history(&self, ids: &[i64]) -> Result<()>;
}
