// src/entity/group.rs
use serde::{Deserialize, Serialize};

/// A quiz topic. Plain CRUD, no lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizGroup {
    pub id: i64,
    pub title: String,
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDraft {
    pub title: String,
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
}
