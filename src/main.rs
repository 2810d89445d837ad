use clap::Parser;
use quizdesk::cli::{
    handle_add_group, handle_add_level, handle_add_question, handle_add_source, handle_delete,
    handle_edit, handle_get, handle_history, handle_init, handle_list, handle_purge,
    handle_restore, handle_stats, handle_trash, AddRecord, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(add) => match add.record {
            AddRecord::Question {
                text,
                explanation,
                group,
                level,
                answers,
                correct,
                source,
                difficulty,
                author,
                notes,
                json,
            } => handle_add_question(
                text,
                explanation,
                group,
                level,
                answers,
                correct,
                source,
                difficulty,
                author,
                notes,
                json,
            ),
            AddRecord::Group {
                title,
                title_ar,
                description,
                icon,
                order,
                json,
            } => handle_add_group(title, title_ar, description, icon, order, json),
            AddRecord::Level {
                title,
                group,
                order,
                json,
            } => handle_add_level(title, group, order, json),
            AddRecord::Source {
                title,
                author,
                description,
                url,
                json,
            } => handle_add_source(title, author, description, url, json),
        },
        Commands::List {
            kind,
            group,
            search,
            json,
        } => handle_list(kind, group, search, json),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Edit {
            id,
            text,
            explanation,
            group,
            level,
            source,
            difficulty,
            answers,
            correct,
            json,
        } => handle_edit(
            id,
            text,
            explanation,
            group,
            level,
            source,
            difficulty,
            answers,
            correct,
            json,
        ),
        Commands::Delete { id } => handle_delete(id),
        Commands::Restore { id } => handle_restore(id),
        Commands::Purge { id, force } => handle_purge(id, force),
        Commands::Trash { json } => handle_trash(json),
        Commands::History { id, json } => handle_history(id, json),
        Commands::Stats { json } => handle_stats(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
