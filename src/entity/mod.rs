mod answer;
mod group;
mod history;
mod level;
mod question;
mod source;

pub use answer::{Answer, AnswerDraft};
pub use group::{GroupDraft, QuizGroup};
pub use history::{AnswerSnapshot, HistoryAction, HistoryEntry, HistorySnapshot};
pub use level::{LevelDraft, QuizLevel};
pub use question::{Difficulty, Question, QuestionDraft};
pub use source::{Source, SourceDraft};
