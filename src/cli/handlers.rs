use std::collections::HashMap;
use std::env;
use std::io;
use std::path::PathBuf;

use crate::entity::{
    Answer, AnswerDraft, GroupDraft, LevelDraft, Question, QuestionDraft, SourceDraft,
};
use crate::error::{QuizdeskError, Result};
use crate::lifecycle;
use crate::store::{QuestionFilter, RecordStore, SqliteStore};

/// Find the project root by looking for .quizdesk/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".quizdesk").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_store() -> Result<SqliteStore> {
    SqliteStore::open(&find_project_root())
}

fn answer_drafts(texts: &[String], correct: usize) -> Vec<AnswerDraft> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| AnswerDraft {
            text: text.clone(),
            is_correct: i + 1 == correct,
        })
        .collect()
}

/// Group id -> title lookup for listing output.
fn group_titles(store: &SqliteStore) -> Result<HashMap<i64, String>> {
    Ok(store
        .list_groups()?
        .into_iter()
        .map(|g| (g.id, g.title))
        .collect())
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _store = SqliteStore::init(&root)?;

    println!("Initialized quizdesk workspace in {}", root.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_add_question(
    text: String,
    explanation: String,
    group: i64,
    level: i64,
    answers: Vec<String>,
    correct: usize,
    source: Option<i64>,
    difficulty: String,
    author: Option<String>,
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    let draft = QuestionDraft {
        text,
        explanation,
        group_id: group,
        level_id: level,
        source_id: source,
        difficulty: difficulty.parse().unwrap_or_default(),
        author,
        notes,
    };

    let question = lifecycle::create_question(&store, &draft, &answer_drafts(&answers, correct))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&question)?);
    } else {
        println!("Created question #{} - {}", question.id, question.text);
    }

    Ok(())
}

pub fn handle_add_group(
    title: String,
    title_ar: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    order: i64,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    let group = store.add_group(&GroupDraft {
        title,
        title_ar,
        description,
        icon,
        sort_order: order,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&group)?);
    } else {
        println!("Created group #{} - {}", group.id, group.title);
    }

    Ok(())
}

pub fn handle_add_level(title: String, group: i64, order: i64, json: bool) -> Result<()> {
    let store = open_store()?;

    let level = store.add_level(&LevelDraft {
        group_id: group,
        title,
        sort_order: order,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&level)?);
    } else {
        println!(
            "Created level #{} - {} (group #{})",
            level.id, level.title, level.group_id
        );
    }

    Ok(())
}

pub fn handle_add_source(
    title: String,
    author: Option<String>,
    description: Option<String>,
    url: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    let source = store.add_source(&SourceDraft {
        title,
        author,
        description,
        url,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&source)?);
    } else {
        println!("Created source #{} - {}", source.id, source.title);
    }

    Ok(())
}

pub fn handle_list(
    kind: Option<String>,
    group: Option<i64>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    let kind = kind.as_deref().unwrap_or("questions");

    match kind {
        "question" | "questions" => {
            let filter = QuestionFilter {
                group_id: group,
                search,
                ..QuestionFilter::active()
            };
            let questions = store.list_questions(&filter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else if questions.is_empty() {
                println!("No questions found.");
            } else {
                let titles = group_titles(&store)?;
                println!("Questions:\n");
                for q in questions {
                    println!("  #{} [{}] {}", q.id, q.difficulty, q.text);
                    if let Some(title) = titles.get(&q.group_id) {
                        println!("      topic: {}", title);
                    }
                }
            }
        }
        "group" | "groups" | "topic" | "topics" => {
            let groups = store.list_groups()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No groups found.");
            } else {
                println!("Groups:\n");
                for g in groups {
                    let icon = g.icon.as_deref().unwrap_or("-");
                    println!("  #{} [{}] {} {}", g.id, g.sort_order, icon, g.title);
                }
            }
        }
        "level" | "levels" => {
            let levels = store.list_levels()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&levels)?);
            } else if levels.is_empty() {
                println!("No levels found.");
            } else {
                let titles = group_titles(&store)?;
                println!("Levels:\n");
                for l in levels {
                    let topic = titles
                        .get(&l.group_id)
                        .map(String::as_str)
                        .unwrap_or("-");
                    println!("  #{} [{}] {} - {}", l.id, l.sort_order, topic, l.title);
                }
            }
        }
        "source" | "sources" => {
            let sources = store.list_sources()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else if sources.is_empty() {
                println!("No sources found.");
            } else {
                println!("Sources:\n");
                for s in sources {
                    let author = s.author.as_deref().unwrap_or("-");
                    println!("  #{} {} ({})", s.id, s.title, author);
                }
            }
        }
        _ => {
            eprintln!(
                "Unknown record type '{}'. Valid types: questions, groups, levels, sources",
                kind
            );
        }
    }

    Ok(())
}

/// A question joined with its answers, for `get` output.
#[derive(serde::Serialize)]
struct QuestionDetail {
    #[serde(flatten)]
    question: Question,
    answers: Vec<Answer>,
}

pub fn handle_get(id: i64, json: bool) -> Result<()> {
    let store = open_store()?;

    let question = store
        .question(id)?
        .ok_or(QuizdeskError::QuestionNotFound(id))?;
    let answers = store.answers_for(id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&QuestionDetail { question, answers })?
        );
        return Ok(());
    }

    println!("Question #{}", question.id);
    println!("Text: {}", question.text);
    if let Some(group) = store.group(question.group_id)? {
        println!("Topic: {}", group.title);
    }
    if let Some(level) = store.level(question.level_id)? {
        println!("Level: {}", level.title);
    }
    println!("Difficulty: {}", question.difficulty);
    if let Some(source_id) = question.source_id {
        if let Some(source) = store.source(source_id)? {
            println!("Source: {}", source.title);
        }
    }
    if let Some(ref author) = question.author {
        println!("Author: {}", author);
    }
    println!("Created: {}", question.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(deleted_at) = question.deleted_at {
        println!("Trashed: {}", deleted_at.format("%Y-%m-%d %H:%M"));
    }

    println!("\nAnswers:");
    for (i, answer) in answers.iter().enumerate() {
        let letter = (b'A' + (i as u8 % 26)) as char;
        let marker = if answer.is_correct { " (correct)" } else { "" };
        println!("  {}) {}{}", letter, answer.text, marker);
    }

    println!("\nExplanation: {}", question.explanation);
    if let Some(ref notes) = question.notes {
        println!("Notes: {}", notes);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_edit(
    id: i64,
    text: Option<String>,
    explanation: Option<String>,
    group: Option<i64>,
    level: Option<i64>,
    source: Option<i64>,
    difficulty: Option<String>,
    answers: Vec<String>,
    correct: Option<usize>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    let question = store
        .question(id)?
        .ok_or(QuizdeskError::QuestionNotFound(id))?;
    let current = store.answers_for(id)?;

    // Merge the provided fields over the stored row; the edit then
    // overwrites the whole row, it does not patch columns.
    let mut draft = question.to_draft();
    if let Some(text) = text {
        draft.text = text;
    }
    if let Some(explanation) = explanation {
        draft.explanation = explanation;
    }
    if let Some(group) = group {
        draft.group_id = group;
    }
    if let Some(level) = level {
        draft.level_id = level;
    }
    if let Some(source) = source {
        draft.source_id = Some(source);
    }
    if let Some(difficulty) = difficulty {
        draft.difficulty = difficulty.parse().unwrap_or(draft.difficulty);
    }

    let answer_set: Vec<AnswerDraft> = if answers.is_empty() {
        current
            .iter()
            .enumerate()
            .map(|(i, a)| AnswerDraft {
                text: a.text.clone(),
                is_correct: match correct {
                    Some(c) => i + 1 == c,
                    None => a.is_correct,
                },
            })
            .collect()
    } else {
        let correct = correct.ok_or_else(|| {
            QuizdeskError::Validation("--correct is required when replacing answers".to_string())
        })?;
        answer_drafts(&answers, correct)
    };

    lifecycle::edit_question(&store, id, &draft, &answer_set)?;

    if json {
        let question = store
            .question(id)?
            .ok_or(QuizdeskError::QuestionNotFound(id))?;
        let answers = store.answers_for(id)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&QuestionDetail { question, answers })?
        );
    } else {
        println!("Updated question #{}", id);
    }

    Ok(())
}

pub fn handle_delete(id: i64) -> Result<()> {
    let store = open_store()?;

    let question = store
        .question(id)?
        .ok_or(QuizdeskError::QuestionNotFound(id))?;

    lifecycle::soft_delete_question(&store, id)?;

    println!("Moved question #{} to the trash - {}", id, question.text);
    Ok(())
}

pub fn handle_restore(id: i64) -> Result<()> {
    let store = open_store()?;

    let question = store
        .question(id)?
        .ok_or(QuizdeskError::QuestionNotFound(id))?;

    lifecycle::restore_question(&store, id)?;

    println!("Restored question #{} - {}", id, question.text);
    Ok(())
}

pub fn handle_purge(id: i64, force: bool) -> Result<()> {
    let store = open_store()?;

    let question = store
        .question(id)?
        .ok_or(QuizdeskError::QuestionNotFound(id))?;

    // Confirm unless --force is used
    if !force {
        eprintln!(
            "Permanently delete question #{} - {}? This cannot be undone. [y/N] ",
            id, question.text
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(QuizdeskError::Store(
                "Use --force to purge in non-interactive mode".to_string(),
            ));
        }
    }

    lifecycle::purge_question(&store, id)?;

    println!("Purged question #{}", id);
    Ok(())
}

pub fn handle_trash(json: bool) -> Result<()> {
    let store = open_store()?;

    let questions = store.list_questions(&QuestionFilter::deleted())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
    } else if questions.is_empty() {
        println!("The trash is empty.");
    } else {
        println!("Trash:\n");
        for q in questions {
            let deleted = q
                .deleted_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!("  #{} deleted {} - {}", q.id, deleted, q.text);
        }
    }

    Ok(())
}

pub fn handle_history(id: i64, json: bool) -> Result<()> {
    let store = open_store()?;

    let entries = store.history_for(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No history for question #{}.", id);
    } else {
        println!("History for question #{}:\n", id);
        for entry in entries {
            println!(
                "  [{}] {}",
                entry.action,
                entry.changed_at.format("%Y-%m-%d %H:%M")
            );
            println!("      {}", entry.text);
            if !entry.answers.is_empty() {
                let summary: Vec<String> = entry
                    .answers
                    .iter()
                    .map(|a| {
                        if a.is_correct {
                            format!("{}*", a.text)
                        } else {
                            a.text.clone()
                        }
                    })
                    .collect();
                println!("      answers: {}", summary.join(", "));
            }
        }
    }

    Ok(())
}

pub fn handle_stats(json: bool) -> Result<()> {
    let store = open_store()?;

    let groups = store.list_groups()?;
    let sources = store.list_sources()?;
    let counts: HashMap<i64, i64> = store.question_counts_by_group()?.into_iter().collect();
    let total: i64 = counts.values().sum();

    if json {
        #[derive(serde::Serialize)]
        struct TopicStats {
            id: i64,
            title: String,
            questions: i64,
        }

        #[derive(serde::Serialize)]
        struct Stats {
            questions: i64,
            groups: usize,
            sources: usize,
            topics: Vec<TopicStats>,
        }

        let topics: Vec<TopicStats> = groups
            .iter()
            .map(|g| TopicStats {
                id: g.id,
                title: g.title.clone(),
                questions: counts.get(&g.id).copied().unwrap_or(0),
            })
            .collect();

        let stats = Stats {
            questions: total,
            groups: groups.len(),
            sources: sources.len(),
            topics,
        };

        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Questions: {}", total);
        println!("Topics: {}", groups.len());
        println!("Sources: {}", sources.len());

        if !groups.is_empty() {
            println!("\nPer topic:");
            for g in &groups {
                let count = counts.get(&g.id).copied().unwrap_or(0);
                println!("  {} - {}", g.title, count);
            }
        }
    }

    Ok(())
}
