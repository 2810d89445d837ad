mod commands;
mod handlers;

pub use commands::{AddCommand, AddRecord, Cli, Commands};
pub use handlers::{
    handle_add_group, handle_add_level, handle_add_question, handle_add_source, handle_delete,
    handle_edit, handle_get, handle_history, handle_init, handle_list, handle_purge,
    handle_restore, handle_stats, handle_trash,
};
