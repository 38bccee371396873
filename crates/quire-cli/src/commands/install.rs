use quire_core::InstallRequest;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InstallArgs;
use crate::config::write_config;
use crate::helpers::read_password;

pub async fn handle_install(ctx: &AppContext<'_>, args: &InstallArgs) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    if db.site().is_installed()? {
        return Err(quire_core::QuireError::AlreadyInstalled.into());
    }
    let password = read_password(ctx.interactive(args.no_input), true)?;

    let request = InstallRequest {
        username: args.username.clone(),
        name: args.name.clone().unwrap_or_else(|| args.username.clone()),
        password: password.to_string(),
        title: args.title.clone(),
        description: args.description.clone(),
        author: args.author.clone(),
        comments_enabled: args.comments,
        registration_enabled: args.registration,
        examples: args.examples,
    };
    let admin = db.site().install(request).await?;
    db.close().await?;

    // Remember where the store lives so later commands find it.
    let config_path = resolve_config_path(ctx.cli())?;
    let wrote_config = !config_path.exists();
    if wrote_config {
        write_config(&config_path, ctx.config())?;
        tracing::info!(path = %config_path.display(), "Wrote config");
    }

    if !ctx.quiet() {
        println!("Installed site with admin {}", admin.username);
        if let Some(path) = ctx.config().store.path.as_ref() {
            println!("Store: {}", path.display());
        }
        if wrote_config {
            println!("Config: {}", config_path.display());
        }
    }
    Ok(())
}
