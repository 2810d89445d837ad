use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizdeskError {
    #[error("Not a quizdesk workspace. Run 'quizdesk init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .quizdesk/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Question not found: {0}")]
    QuestionNotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, QuizdeskError>;
