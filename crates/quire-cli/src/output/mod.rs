//! Output formatting for the CLI.

mod json;
mod text;

pub use json::print_json;
pub use text::{
    articles_table, logs_table, print_article, print_authored, print_settings, users_table,
};
