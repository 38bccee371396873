use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use quire_core::VERSION;

/// Quire - administer a small blog's store from the command line
#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(short, long, global = true, env = "QUIRE_STORE")]
    pub store: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, env = "QUIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a fresh site: settings and the admin account
    Install(InstallArgs),

    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Check a username and password
    Login(LoginArgs),

    /// Write and moderate articles
    #[command(subcommand)]
    Article(ArticleCommand),

    /// Post and remove comments
    #[command(subcommand)]
    Comment(CommentCommand),

    /// Show or change site settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Record a page visit
    Visit(VisitArgs),

    /// Show the visit log
    Logs(LogsArgs),
}

/// Arguments for the `install` command
#[derive(Args)]
pub struct InstallArgs {
    /// Admin username
    #[arg(long)]
    pub username: String,

    /// Admin display name (defaults to the username)
    #[arg(long)]
    pub name: Option<String>,

    /// Site title
    #[arg(long)]
    pub title: String,

    /// Site description
    #[arg(long)]
    pub description: String,

    /// Site author
    #[arg(long)]
    pub author: String,

    /// Allow readers to comment
    #[arg(long)]
    pub comments: bool,

    /// Allow visitors to register accounts
    #[arg(long)]
    pub registration: bool,

    /// Seed an example article and comment
    #[arg(long)]
    pub examples: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user
    Add {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,

        /// Disable interactive prompts
        #[arg(long)]
        no_input: bool,
    },

    /// List users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user and what they have written
    Show {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a user's profile
    Edit(UserEditArgs),
}

/// Arguments for `user edit`
#[derive(Args)]
pub struct UserEditArgs {
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New avatar URL
    #[arg(long, conflicts_with = "clear_avatar")]
    pub avatar: Option<String>,

    /// Remove the avatar
    #[arg(long)]
    pub clear_avatar: bool,

    /// Grant or revoke admin rights
    #[arg(long, value_name = "BOOL")]
    pub admin: Option<bool>,

    /// Set a new password (read from QUIRE_PASSWORD or prompted)
    #[arg(long)]
    pub password: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `login` command
#[derive(Args)]
pub struct LoginArgs {
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Print the session as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum ArticleCommand {
    /// Write a new article (unpublished unless --publish)
    Add {
        /// Article title
        #[arg(long)]
        title: String,

        /// Author username
        #[arg(long)]
        author: String,

        /// Article body in markdown (read from stdin if omitted)
        #[arg(long)]
        body: Option<String>,

        /// Publish immediately
        #[arg(long)]
        publish: bool,

        /// Set custom date/time (ISO-8601 or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// List titled articles
    List {
        /// Only published articles
        #[arg(long)]
        published: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an article with its comments
    Show {
        #[arg(value_name = "ID")]
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change an article's title or body
    Edit {
        #[arg(value_name = "ID")]
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body in markdown
        #[arg(long)]
        body: Option<String>,
    },

    /// Make an article public
    Publish {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Hide an article
    Unpublish {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Delete an article (its comments are kept)
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum CommentCommand {
    /// Comment on an article
    Add {
        /// Article to comment on
        #[arg(value_name = "ARTICLE_ID")]
        article: u64,

        /// Author username
        #[arg(long)]
        author: String,

        /// Comment body in markdown (read from stdin if omitted)
        #[arg(long)]
        body: Option<String>,
    },

    /// Delete a comment
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set one setting ("true"/"false" are stored as booleans)
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,
    },
}

/// Arguments for the `visit` command
#[derive(Args)]
pub struct VisitArgs {
    /// Requested path
    #[arg(value_name = "PAGE")]
    pub page: String,

    /// Client address
    #[arg(long)]
    pub ip: String,

    /// Client user agent
    #[arg(long)]
    pub agent: Option<String>,
}

/// Arguments for the `logs` command
#[derive(Args)]
pub struct LogsArgs {
    /// Show only the most recent N visits
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
