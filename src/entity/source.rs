// src/entity/source.rs
use serde::{Deserialize, Serialize};

/// A reference source a question may cite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDraft {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}
