//! History recorder.
//!
//! Before a question is mutated, its current persisted state (including the
//! answer set) is copied into the history table, tagged with what is about
//! to happen. Retention is purely count-based: only the 5 most recent
//! snapshots per question are kept.

use tracing::warn;

use crate::entity::{HistoryAction, HistorySnapshot};
use crate::error::Result;
use crate::store::RecordStore;

/// Snapshots retained per question. Inserting one more evicts the oldest.
pub const HISTORY_LIMIT: usize = 5;

/// Snapshot the current persisted state of a question, then prune.
///
/// A question that cannot be found is a silent no-op: snapshots are
/// best-effort audit data, and the caller's own mutation will surface the
/// missing row if it matters.
pub fn record_snapshot<S: RecordStore>(
    store: &S,
    question_id: i64,
    action: HistoryAction,
) -> Result<()> {
    let question = match store.question(question_id)? {
        Some(q) => q,
        None => return Ok(()),
    };
    let answers = store.answers_for(question_id)?;

    store.insert_history(&HistorySnapshot::capture(&question, &answers, action))?;

    // Evict everything beyond the HISTORY_LIMIT most recent changes.
    let ids = store.history_ids(question_id)?;
    if ids.len() > HISTORY_LIMIT {
        store.delete_history(&ids[HISTORY_LIMIT..])?;
    }

    Ok(())
}

/// Snapshot without blocking the caller: failures are logged, not returned.
///
/// The lifecycle paths use this so that a broken history table never stops
/// an edit, soft delete or restore from going through.
pub fn record_snapshot_best_effort<S: RecordStore>(
    store: &S,
    question_id: i64,
    action: HistoryAction,
) {
    if let Err(err) = record_snapshot(store, question_id, action) {
        warn!(
            question_id,
            action = %action,
            error = %err,
            "history snapshot failed, continuing without it"
        );
    }
}
