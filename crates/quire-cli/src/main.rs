//! Quire CLI - administer a small blog's store from the command line
//!
//! This is the command-line interface for Quire. It opens the store,
//! calls into `quire-core`, and prints the results.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::constants::DEFAULT_LOG_DIRECTIVE;
use crate::errors::exit_code_for;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli)?;
    match &cli.command {
        Commands::Install(args) => commands::handle_install(&ctx, args).await,
        Commands::User(command) => commands::handle_user(&ctx, command).await,
        Commands::Login(args) => commands::handle_login(&ctx, args).await,
        Commands::Article(command) => commands::handle_article(&ctx, command).await,
        Commands::Comment(command) => commands::handle_comment(&ctx, command).await,
        Commands::Settings(command) => commands::handle_settings(&ctx, command).await,
        Commands::Visit(args) => commands::handle_visit(&ctx, args).await,
        Commands::Logs(args) => commands::handle_logs(&ctx, args).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}
