use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quizdesk")]
#[command(version, about = "A curation desk for quiz content")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a quizdesk workspace in the current directory
    Init,

    /// Add a new record
    Add(AddCommand),

    /// List records
    List {
        /// Record type to list (questions, groups, levels, sources)
        #[arg(value_name = "TYPE")]
        kind: Option<String>,

        /// Only questions belonging to this topic group
        #[arg(long)]
        group: Option<i64>,

        /// Only questions whose text contains this term
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single question with its answers
    Get {
        /// Question id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a question, overwriting its row and replacing its answer set
    Edit {
        /// Question id
        id: i64,

        /// New question text
        #[arg(long)]
        text: Option<String>,

        /// New explanation of the correct answer
        #[arg(long)]
        explanation: Option<String>,

        /// Move to this topic group
        #[arg(long)]
        group: Option<i64>,

        /// Move to this level
        #[arg(long)]
        level: Option<i64>,

        /// Cite this source
        #[arg(long)]
        source: Option<i64>,

        /// New difficulty (easy, medium, hard)
        #[arg(long)]
        difficulty: Option<String>,

        /// Replacement answer option (give four times)
        #[arg(long = "answer", short = 'a')]
        answers: Vec<String>,

        /// Position of the correct answer, 1-4
        #[arg(long)]
        correct: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a question to the trash (soft delete)
    Delete {
        /// Question id
        id: i64,
    },

    /// Restore a question from the trash
    Restore {
        /// Question id
        id: i64,
    },

    /// Permanently delete a question. Cannot be undone
    Purge {
        /// Question id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// List trashed questions
    Trash {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the edit history of a question
    History {
        /// Question id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show content totals per topic
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub record: AddRecord,
}

#[derive(Subcommand, Debug)]
pub enum AddRecord {
    /// Add a question with its four answers
    Question {
        /// Question text
        #[arg(long)]
        text: String,

        /// Explanation of the correct answer
        #[arg(long)]
        explanation: String,

        /// Topic group id
        #[arg(long)]
        group: i64,

        /// Level id
        #[arg(long)]
        level: i64,

        /// Answer option (give four times)
        #[arg(long = "answer", short = 'a')]
        answers: Vec<String>,

        /// Position of the correct answer, 1-4
        #[arg(long)]
        correct: usize,

        /// Source id to cite
        #[arg(long)]
        source: Option<i64>,

        /// Difficulty (easy, medium, hard)
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Question author
        #[arg(long)]
        author: Option<String>,

        /// Free-form curation notes
        #[arg(long)]
        notes: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a topic group
    Group {
        /// Group title
        title: String,

        /// Arabic title
        #[arg(long = "title-ar")]
        title_ar: Option<String>,

        /// Group description
        #[arg(long)]
        description: Option<String>,

        /// Display icon
        #[arg(long)]
        icon: Option<String>,

        /// Display position
        #[arg(long, default_value_t = 0)]
        order: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a level to a topic group
    Level {
        /// Level title
        title: String,

        /// Topic group id
        #[arg(long)]
        group: i64,

        /// Display position within the group
        #[arg(long, default_value_t = 0)]
        order: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a source
    Source {
        /// Source title
        title: String,

        /// Source author
        #[arg(long)]
        author: Option<String>,

        /// Source description
        #[arg(long)]
        description: Option<String>,

        /// Source URL
        #[arg(long)]
        url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
