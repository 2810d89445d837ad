use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::entity::{
    Answer, AnswerDraft, GroupDraft, HistoryEntry, HistorySnapshot, LevelDraft, Question,
    QuestionDraft, QuizGroup, QuizLevel, Source, SourceDraft,
};
use crate::error::{QuizdeskError, Result};
use crate::store::{QuestionFilter, QuestionState, RecordStore};

const QUIZDESK_DIR: &str = ".quizdesk";
const QUIZ_DB: &str = "quizdesk.db";

/// SQLite-backed record store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Initialize a new quizdesk workspace
    pub fn init(root: &Path) -> Result<Self> {
        let quizdesk_dir = root.join(QUIZDESK_DIR);

        if quizdesk_dir.exists() {
            return Err(QuizdeskError::AlreadyInitialized);
        }

        fs::create_dir_all(&quizdesk_dir)?;

        let conn = Connection::open(quizdesk_dir.join(QUIZ_DB))?;
        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an existing quizdesk workspace
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(QUIZDESK_DIR).join(QUIZ_DB);

        if !path.exists() {
            return Err(QuizdeskError::NotInitialized);
        }

        let conn = Connection::open(&path)?;
        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        // No foreign keys on answers or history: answers are replaced
        // wholesale on edit and history rows outlive a purged question.
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS quiz_groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                title_ar TEXT,
                description TEXT,
                icon TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS quiz_levels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS sources (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT,
                description TEXT,
                url TEXT
            );

            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                explanation TEXT NOT NULL,
                group_id INTEGER NOT NULL,
                level_id INTEGER NOT NULL,
                source_id INTEGER,
                difficulty TEXT NOT NULL DEFAULT 'medium',
                author TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                deleted_at TEXT
            );

            CREATE TABLE IF NOT EXISTS answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                is_correct INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_answers_question ON answers(question_id);

            CREATE TABLE IF NOT EXISTS question_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                explanation TEXT NOT NULL,
                group_id INTEGER NOT NULL,
                level_id INTEGER NOT NULL,
                source_id INTEGER,
                difficulty TEXT NOT NULL,
                answers TEXT NOT NULL,
                action TEXT NOT NULL,
                changed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_question ON question_history(question_id);
            ",
        )?;

        Ok(())
    }

    // ========== Reference Entities ==========

    /// Add a topic group and return it with its assigned id
    pub fn add_group(&self, draft: &GroupDraft) -> Result<QuizGroup> {
        self.conn.execute(
            "INSERT INTO quiz_groups (title, title_ar, description, icon, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.title,
                draft.title_ar,
                draft.description,
                draft.icon,
                draft.sort_order,
            ],
        )?;

        Ok(QuizGroup {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            title_ar: draft.title_ar.clone(),
            description: draft.description.clone(),
            icon: draft.icon.clone(),
            sort_order: draft.sort_order,
        })
    }

    /// Get a topic group by id
    pub fn group(&self, id: i64) -> Result<Option<QuizGroup>> {
        let group = self
            .conn
            .query_row(
                "SELECT id, title, title_ar, description, icon, sort_order
                 FROM quiz_groups WHERE id = ?1",
                [id],
                group_from_row,
            )
            .optional()?;
        Ok(group)
    }

    /// List all topic groups in display order
    pub fn list_groups(&self) -> Result<Vec<QuizGroup>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, title_ar, description, icon, sort_order
             FROM quiz_groups ORDER BY sort_order, id",
        )?;
        let rows = stmt.query_map([], group_from_row)?;
        collect_rows(rows)
    }

    /// Add a level and return it with its assigned id
    pub fn add_level(&self, draft: &LevelDraft) -> Result<QuizLevel> {
        self.conn.execute(
            "INSERT INTO quiz_levels (group_id, title, sort_order) VALUES (?1, ?2, ?3)",
            params![draft.group_id, draft.title, draft.sort_order],
        )?;

        Ok(QuizLevel {
            id: self.conn.last_insert_rowid(),
            group_id: draft.group_id,
            title: draft.title.clone(),
            sort_order: draft.sort_order,
        })
    }

    /// Get a level by id
    pub fn level(&self, id: i64) -> Result<Option<QuizLevel>> {
        let level = self
            .conn
            .query_row(
                "SELECT id, group_id, title, sort_order FROM quiz_levels WHERE id = ?1",
                [id],
                level_from_row,
            )
            .optional()?;
        Ok(level)
    }

    /// List all levels, grouped by topic in display order
    pub fn list_levels(&self) -> Result<Vec<QuizLevel>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, group_id, title, sort_order
             FROM quiz_levels ORDER BY group_id, sort_order, id",
        )?;
        let rows = stmt.query_map([], level_from_row)?;
        collect_rows(rows)
    }

    /// Add a source and return it with its assigned id
    pub fn add_source(&self, draft: &SourceDraft) -> Result<Source> {
        self.conn.execute(
            "INSERT INTO sources (title, author, description, url) VALUES (?1, ?2, ?3, ?4)",
            params![draft.title, draft.author, draft.description, draft.url],
        )?;

        Ok(Source {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            author: draft.author.clone(),
            description: draft.description.clone(),
            url: draft.url.clone(),
        })
    }

    /// Get a source by id
    pub fn source(&self, id: i64) -> Result<Option<Source>> {
        let source = self
            .conn
            .query_row(
                "SELECT id, title, author, description, url FROM sources WHERE id = ?1",
                [id],
                source_from_row,
            )
            .optional()?;
        Ok(source)
    }

    /// List all sources alphabetically
    pub fn list_sources(&self) -> Result<Vec<Source>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, author, description, url FROM sources ORDER BY title, id")?;
        let rows = stmt.query_map([], source_from_row)?;
        collect_rows(rows)
    }

    /// Active question counts per topic group
    pub fn question_counts_by_group(&self) -> Result<Vec<(i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT group_id, COUNT(*) FROM questions
             WHERE deleted_at IS NULL GROUP BY group_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        collect_rows(rows)
    }
}

impl RecordStore for SqliteStore {
    fn question(&self, id: i64) -> Result<Option<Question>> {
        let question = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", QUESTION_SELECT),
                [id],
                question_from_row,
            )
            .optional()?;
        Ok(question)
    }

    fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>> {
        let mut sql = String::from(QUESTION_SELECT);
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match filter.state {
            QuestionState::Active => clauses.push("deleted_at IS NULL".to_string()),
            QuestionState::Deleted => clauses.push("deleted_at IS NOT NULL".to_string()),
        }

        if let Some(group_id) = filter.group_id {
            values.push(Box::new(group_id));
            clauses.push(format!("group_id = ?{}", values.len()));
        }

        if let Some(ref term) = filter.search {
            values.push(Box::new(term.clone()));
            clauses.push(format!(
                "lower(text) LIKE '%' || lower(?{}) || '%'",
                values.len()
            ));
        }

        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        sql.push_str(match filter.state {
            QuestionState::Active => " ORDER BY id DESC",
            QuestionState::Deleted => " ORDER BY deleted_at DESC, id DESC",
        });

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(values.iter().map(|v| v.as_ref())),
            question_from_row,
        )?;
        collect_rows(rows)
    }

    fn insert_question(&self, draft: &QuestionDraft) -> Result<Question> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO questions
             (text, explanation, group_id, level_id, source_id, difficulty, author, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                draft.text,
                draft.explanation,
                draft.group_id,
                draft.level_id,
                draft.source_id,
                draft.difficulty.to_string(),
                draft.author,
                draft.notes,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Question {
            id: self.conn.last_insert_rowid(),
            text: draft.text.clone(),
            explanation: draft.explanation.clone(),
            group_id: draft.group_id,
            level_id: draft.level_id,
            source_id: draft.source_id,
            difficulty: draft.difficulty,
            author: draft.author.clone(),
            notes: draft.notes.clone(),
            created_at,
            deleted_at: None,
        })
    }

    fn update_question(&self, id: i64, draft: &QuestionDraft) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE questions
             SET text = ?1, explanation = ?2, group_id = ?3, level_id = ?4,
                 source_id = ?5, difficulty = ?6, author = ?7, notes = ?8
             WHERE id = ?9",
            params![
                draft.text,
                draft.explanation,
                draft.group_id,
                draft.level_id,
                draft.source_id,
                draft.difficulty.to_string(),
                draft.author,
                draft.notes,
                id,
            ],
        )?;

        if updated == 0 {
            return Err(QuizdeskError::QuestionNotFound(id));
        }
        Ok(())
    }

    fn set_deleted_at(&self, id: i64, deleted_at: Option<DateTime<Utc>>) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE questions SET deleted_at = ?1 WHERE id = ?2",
            params![deleted_at.map(|t| t.to_rfc3339()), id],
        )?;

        if updated == 0 {
            return Err(QuizdeskError::QuestionNotFound(id));
        }
        Ok(())
    }

    fn delete_question(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM questions WHERE id = ?1", [id])?;
        Ok(())
    }

    fn answers_for(&self, question_id: i64) -> Result<Vec<Answer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question_id, text, is_correct
             FROM answers WHERE question_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([question_id], answer_from_row)?;
        collect_rows(rows)
    }

    fn insert_answers(&self, question_id: i64, answers: &[AnswerDraft]) -> Result<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO answers (question_id, text, is_correct) VALUES (?1, ?2, ?3)",
        )?;
        for answer in answers {
            stmt.execute(params![question_id, answer.text, answer.is_correct])?;
        }
        Ok(())
    }

    fn delete_answers(&self, question_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM answers WHERE question_id = ?1", [question_id])?;
        Ok(())
    }

    fn insert_history(&self, snapshot: &HistorySnapshot) -> Result<()> {
        self.conn.execute(
            "INSERT INTO question_history
             (question_id, text, explanation, group_id, level_id, source_id,
              difficulty, answers, action, changed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                snapshot.question_id,
                snapshot.text,
                snapshot.explanation,
                snapshot.group_id,
                snapshot.level_id,
                snapshot.source_id,
                snapshot.difficulty.to_string(),
                serde_json::to_string(&snapshot.answers)?,
                snapshot.action.to_string(),
                snapshot.changed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn history_for(&self, question_id: i64) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question_id, text, explanation, group_id, level_id, source_id,
                    difficulty, answers, action, changed_at
             FROM question_history WHERE question_id = ?1
             ORDER BY changed_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([question_id], history_from_row)?;
        collect_rows(rows)
    }

    fn history_ids(&self, question_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM question_history WHERE question_id = ?1
             ORDER BY changed_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([question_id], |row| row.get(0))?;
        collect_rows(rows)
    }

    fn delete_history(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM question_history WHERE id IN ({})", placeholders);
        self.conn.execute(&sql, params_from_iter(ids.iter()))?;
        Ok(())
    }
}

const QUESTION_SELECT: &str = "SELECT id, text, explanation, group_id, level_id, source_id, \
     difficulty, author, notes, created_at, deleted_at FROM questions";

fn collect_rows<T, F>(rows: rusqlite::MappedRows<'_, F>) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(Into::into)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    let difficulty: String = row.get(6)?;
    let created_at: String = row.get(9)?;
    let deleted_at: Option<String> = row.get(10)?;

    Ok(Question {
        id: row.get(0)?,
        text: row.get(1)?,
        explanation: row.get(2)?,
        group_id: row.get(3)?,
        level_id: row.get(4)?,
        source_id: row.get(5)?,
        difficulty: difficulty.parse().unwrap_or_default(),
        author: row.get(7)?,
        notes: row.get(8)?,
        created_at: parse_timestamp(9, &created_at)?,
        deleted_at: match deleted_at {
            Some(value) => Some(parse_timestamp(10, &value)?),
            None => None,
        },
    })
}

fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: row.get(0)?,
        question_id: row.get(1)?,
        text: row.get(2)?,
        is_correct: row.get(3)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let difficulty: String = row.get(7)?;
    let answers_json: String = row.get(8)?;
    let action: String = row.get(9)?;
    let changed_at: String = row.get(10)?;

    Ok(HistoryEntry {
        id: row.get(0)?,
        question_id: row.get(1)?,
        text: row.get(2)?,
        explanation: row.get(3)?,
        group_id: row.get(4)?,
        level_id: row.get(5)?,
        source_id: row.get(6)?,
        difficulty: difficulty.parse().unwrap_or_default(),
        answers: serde_json::from_str(&answers_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
        action: action.parse().unwrap_or_default(),
        changed_at: parse_timestamp(10, &changed_at)?,
    })
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<QuizGroup> {
    Ok(QuizGroup {
        id: row.get(0)?,
        title: row.get(1)?,
        title_ar: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        sort_order: row.get(5)?,
    })
}

fn level_from_row(row: &Row<'_>) -> rusqlite::Result<QuizLevel> {
    Ok(QuizLevel {
        id: row.get(0)?,
        group_id: row.get(1)?,
        title: row.get(2)?,
        sort_order: row.get(3)?,
    })
}

fn source_from_row(row: &Row<'_>) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        description: row.get(3)?,
        url: row.get(4)?,
    })
}
