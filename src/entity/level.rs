// src/entity/level.rs
use serde::{Deserialize, Serialize};

/// A difficulty level within a topic group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizLevel {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDraft {
    pub group_id: i64,
    pub title: String,
    pub sort_order: i64,
}
