//! Command handlers, one module per command group.

mod articles;
mod comments;
mod install;
mod logs;
mod settings;
mod users;

pub use articles::handle_article;
pub use comments::handle_comment;
pub use install::handle_install;
pub use logs::{handle_logs, handle_visit};
pub use settings::handle_settings;
pub use users::{handle_login, handle_user};
