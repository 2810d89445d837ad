//! Question lifecycle policy.
//!
//! Maps each curator action to its snapshot-then-mutate sequence. A
//! question is either active (`deleted_at` null) or trashed; every
//! non-terminal transition records a history snapshot of the pre-mutation
//! state *before* touching the row. There is no transaction spanning the
//! two writes, so the ordering here is the only thing keeping the audit
//! trail meaningful.

use chrono::Utc;

use crate::entity::{AnswerDraft, HistoryAction, Question, QuestionDraft};
use crate::error::{QuizdeskError, Result};
use crate::history;
use crate::store::RecordStore;

/// Every question carries exactly this many answer options.
pub const ANSWERS_PER_QUESTION: usize = 4;

/// Check the required fields and the answer convention before any write.
fn validate(draft: &QuestionDraft, answers: &[AnswerDraft]) -> Result<()> {
    if draft.text.trim().is_empty() {
        return Err(QuizdeskError::Validation("question text is required".to_string()));
    }
    if draft.explanation.trim().is_empty() {
        return Err(QuizdeskError::Validation("an explanation is required".to_string()));
    }
    if answers.len() != ANSWERS_PER_QUESTION {
        return Err(QuizdeskError::Validation(format!(
            "expected {} answers, got {}",
            ANSWERS_PER_QUESTION,
            answers.len()
        )));
    }
    if answers.iter().any(|a| a.text.trim().is_empty()) {
        return Err(QuizdeskError::Validation("answer text is required".to_string()));
    }
    let correct = answers.iter().filter(|a| a.is_correct).count();
    if correct != 1 {
        return Err(QuizdeskError::Validation(format!(
            "exactly one answer must be marked correct, found {}",
            correct
        )));
    }
    Ok(())
}

/// Create a question with its answer set. No snapshot: there is no prior
/// state to record.
pub fn create_question<S: RecordStore>(
    store: &S,
    draft: &QuestionDraft,
    answers: &[AnswerDraft],
) -> Result<Question> {
    validate(draft, answers)?;

    let question = store.insert_question(draft)?;
    store.insert_answers(question.id, answers)?;

    Ok(question)
}

/// Overwrite a question and replace its answer set.
///
/// The snapshot carries the pre-edit values. Answers are not patched: the
/// old set is deleted and the new one inserted, and a failure between the
/// two phases leaves the question with no answers.
pub fn edit_question<S: RecordStore>(
    store: &S,
    id: i64,
    draft: &QuestionDraft,
    answers: &[AnswerDraft],
) -> Result<()> {
    validate(draft, answers)?;

    history::record_snapshot_best_effort(store, id, HistoryAction::Update);

    store.update_question(id, draft)?;
    store.delete_answers(id)?;
    store.insert_answers(id, answers)?;

    Ok(())
}

/// Move a question to the trash. Its answers stay in place.
pub fn soft_delete_question<S: RecordStore>(store: &S, id: i64) -> Result<()> {
    history::record_snapshot_best_effort(store, id, HistoryAction::Delete);
    store.set_deleted_at(id, Some(Utc::now()))
}

/// Bring a trashed question back.
pub fn restore_question<S: RecordStore>(store: &S, id: i64) -> Result<()> {
    history::record_snapshot_best_effort(store, id, HistoryAction::Restore);
    store.set_deleted_at(id, None)
}

/// Remove a question for good: answers first, then the row itself.
///
/// Terminal transition, so no snapshot is taken. Existing history rows are
/// left behind as an audit trail of the question that was.
pub fn purge_question<S: RecordStore>(store: &S, id: i64) -> Result<()> {
    store.delete_answers(id)?;
    store.delete_question(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        Answer, Difficulty, HistoryEntry, HistorySnapshot,
    };
    use crate::store::{QuestionFilter, SqliteStore};
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            text: "Which planet is known as the red planet?".to_string(),
            explanation: "Iron oxide on the surface gives Mars its color.".to_string(),
            group_id: 3,
            level_id: 7,
            source_id: Some(2),
            difficulty: Difficulty::Easy,
            author: Some("amal".to_string()),
            notes: None,
        }
    }

    fn answers(correct: usize) -> Vec<AnswerDraft> {
        ["Venus", "Mars", "Jupiter", "Saturn"]
            .iter()
            .enumerate()
            .map(|(i, text)| AnswerDraft {
                text: text.to_string(),
                is_correct: i == correct,
            })
            .collect()
    }

    fn store_with_question() -> (TempDir, SqliteStore, i64) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let question = create_question(&store, &draft(), &answers(1)).unwrap();
        let id = question.id;
        (tmp, store, id)
    }

    #[test]
    fn test_create_inserts_question_and_answers() {
        let (_tmp, store, id) = store_with_question();

        let question = store.question(id).unwrap().unwrap();
        assert_eq!(question.deleted_at, None);

        let stored = store.answers_for(id).unwrap();
        assert_eq!(stored.len(), 4);
        assert!(stored[1].is_correct);
        assert!(store.history_for(id).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_wrong_answer_count() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let mut three = answers(0);
        three.pop();
        let result = create_question(&store, &draft(), &three);
        assert!(matches!(result, Err(QuizdeskError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_zero_or_two_correct_answers() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let mut none_correct = answers(0);
        none_correct[0].is_correct = false;
        assert!(matches!(
            create_question(&store, &draft(), &none_correct),
            Err(QuizdeskError::Validation(_))
        ));

        let mut two_correct = answers(0);
        two_correct[3].is_correct = true;
        assert!(matches!(
            create_question(&store, &draft(), &two_correct),
            Err(QuizdeskError::Validation(_))
        ));
    }

    #[test]
    fn test_create_rejects_empty_text() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let mut blank = draft();
        blank.text = "   ".to_string();
        assert!(matches!(
            create_question(&store, &blank, &answers(1)),
            Err(QuizdeskError::Validation(_))
        ));
    }

    #[test]
    fn test_edit_snapshots_pre_edit_values() {
        let (_tmp, store, id) = store_with_question();

        let mut updated = draft();
        updated.text = "Which planet has the tallest volcano?".to_string();
        edit_question(&store, id, &updated, &answers(1)).unwrap();

        let question = store.question(id).unwrap().unwrap();
        assert_eq!(question.text, "Which planet has the tallest volcano?");

        // The snapshot holds the text from before the edit
        let entries = store.history_for(id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, HistoryAction::Update);
        assert_eq!(entries[0].text, "Which planet is known as the red planet?");
    }

    #[test]
    fn test_edit_replaces_answer_set() {
        let (_tmp, store, id) = store_with_question();
        let before: Vec<Answer> = store.answers_for(id).unwrap();

        edit_question(&store, id, &draft(), &answers(2)).unwrap();

        let after = store.answers_for(id).unwrap();
        assert_eq!(after.len(), 4);
        assert!(after[2].is_correct);
        // Full replacement, not a patch: every row id is new
        assert!(after.iter().all(|a| before.iter().all(|b| b.id != a.id)));
    }

    #[test]
    fn test_edit_missing_question_fails_without_history() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let result = edit_question(&store, 50, &draft(), &answers(0));
        assert!(matches!(result, Err(QuizdeskError::QuestionNotFound(50))));
        assert!(store.history_for(50).unwrap().is_empty());
    }

    #[test]
    fn test_edit_history_grows_by_one_up_to_the_cap() {
        let (_tmp, store, id) = store_with_question();

        for i in 0..7 {
            let mut updated = draft();
            updated.text = format!("Revision {}", i);
            edit_question(&store, id, &updated, &answers(1)).unwrap();

            let expected = usize::min(i + 1, history::HISTORY_LIMIT);
            assert_eq!(store.history_for(id).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_edit_at_cap_evicts_oldest_snapshot() {
        let (_tmp, store, id) = store_with_question();

        for i in 0..history::HISTORY_LIMIT {
            let mut updated = draft();
            updated.text = format!("Revision {}", i);
            edit_question(&store, id, &updated, &answers(1)).unwrap();
        }

        // Oldest snapshot is the original text
        let entries = store.history_for(id).unwrap();
        assert_eq!(entries.last().unwrap().text, "Which planet is known as the red planet?");

        let mut updated = draft();
        updated.text = "Revision 5".to_string();
        edit_question(&store, id, &updated, &answers(1)).unwrap();

        let entries = store.history_for(id).unwrap();
        assert_eq!(entries.len(), history::HISTORY_LIMIT);
        assert_eq!(entries.last().unwrap().text, "Revision 0");
        assert_eq!(entries[0].text, "Revision 4");
    }

    #[test]
    fn test_soft_delete_marks_and_hides_the_question() {
        let (_tmp, store, id) = store_with_question();

        soft_delete_question(&store, id).unwrap();

        let question = store.question(id).unwrap().unwrap();
        assert!(question.deleted_at.is_some());

        assert!(store.list_questions(&QuestionFilter::active()).unwrap().is_empty());
        let trashed = store.list_questions(&QuestionFilter::deleted()).unwrap();
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].id, id);

        // Answers survive a soft delete
        assert_eq!(store.answers_for(id).unwrap().len(), 4);

        let entries = store.history_for(id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, HistoryAction::Delete);
    }

    #[test]
    fn test_restore_round_trip_preserves_identity() {
        let (_tmp, store, id) = store_with_question();
        let before = store.question(id).unwrap().unwrap();

        soft_delete_question(&store, id).unwrap();
        restore_question(&store, id).unwrap();

        let after = store.question(id).unwrap().unwrap();
        assert_eq!(after.deleted_at, None);
        assert_eq!(after.id, before.id);
        assert_eq!(after.text, before.text);
        assert_eq!(after.group_id, before.group_id);

        let entries = store.history_for(id).unwrap();
        assert_eq!(entries[0].action, HistoryAction::Restore);
        assert_eq!(entries[1].action, HistoryAction::Delete);
    }

    #[test]
    fn test_purge_removes_rows_but_keeps_history() {
        let (_tmp, store, id) = store_with_question();

        edit_question(&store, id, &draft(), &answers(3)).unwrap();
        soft_delete_question(&store, id).unwrap();
        let history_before = store.history_for(id).unwrap().len();

        purge_question(&store, id).unwrap();

        assert!(store.question(id).unwrap().is_none());
        assert!(store.answers_for(id).unwrap().is_empty());
        // Orphaned on purpose: the audit trail outlives the question
        assert_eq!(store.history_for(id).unwrap().len(), history_before);
    }

    /// Store whose history inserts always fail, for the advisory policy.
    struct BrokenHistoryStore {
        inner: SqliteStore,
    }

    impl RecordStore for BrokenHistoryStore {
        fn question(&self, id: i64) -> crate::Result<Option<Question>> {
            self.inner.question(id)
        }
        fn list_questions(&self, filter: &QuestionFilter) -> crate::Result<Vec<Question>> {
            self.inner.list_questions(filter)
        }
        fn insert_question(&self, draft: &QuestionDraft) -> crate::Result<Question> {
            self.inner.insert_question(draft)
        }
        fn update_question(&self, id: i64, draft: &QuestionDraft) -> crate::Result<()> {
            self.inner.update_question(id, draft)
        }
        fn set_deleted_at(&self, id: i64, deleted_at: Option<DateTime<Utc>>) -> crate::Result<()> {
            self.inner.set_deleted_at(id, deleted_at)
        }
        fn delete_question(&self, id: i64) -> crate::Result<()> {
            self.inner.delete_question(id)
        }
        fn answers_for(&self, question_id: i64) -> crate::Result<Vec<Answer>> {
            self.inner.answers_for(question_id)
        }
        fn insert_answers(&self, question_id: i64, answers: &[AnswerDraft]) -> crate::Result<()> {
            self.inner.insert_answers(question_id, answers)
        }
        fn delete_answers(&self, question_id: i64) -> crate::Result<()> {
            self.inner.delete_answers(question_id)
        }
        fn insert_history(&self, _snapshot: &HistorySnapshot) -> crate::Result<()> {
            Err(QuizdeskError::Store("history table unavailable".to_string()))
        }
        fn history_for(&self, question_id: i64) -> crate::Result<Vec<HistoryEntry>> {
            self.inner.history_for(question_id)
        }
        fn history_ids(&self, question_id: i64) -> crate::Result<Vec<i64>> {
            self.inner.history_ids(question_id)
        }
        fn delete_history(&self, ids: &[i64]) -> crate::Result<()> {
            self.inner.delete_history(ids)
        }
    }

    #[test]
    fn test_history_failure_does_not_block_the_edit() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let question = create_question(&store, &draft(), &answers(1)).unwrap();
        let broken = BrokenHistoryStore { inner: store };

        let mut updated = draft();
        updated.text = "Edited despite broken history".to_string();
        edit_question(&broken, question.id, &updated, &answers(1)).unwrap();

        let after = broken.inner.question(question.id).unwrap().unwrap();
        assert_eq!(after.text, "Edited despite broken history");
        assert!(broken.inner.history_for(question.id).unwrap().is_empty());
    }

    #[test]
    fn test_history_failure_does_not_block_soft_delete() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let question = create_question(&store, &draft(), &answers(1)).unwrap();
        let broken = BrokenHistoryStore { inner: store };

        soft_delete_question(&broken, question.id).unwrap();
        assert!(broken
            .inner
            .question(question.id)
            .unwrap()
            .unwrap()
            .deleted_at
            .is_some());
    }
}
