use quire_core::UserEdit;

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::{LoginArgs, UserCommand, UserEditArgs};
use crate::errors::CliError;
use crate::helpers::read_password;
use crate::output::{print_authored, print_json, users_table};

pub async fn handle_user(ctx: &AppContext<'_>, command: &UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::Add {
            username,
            name,
            admin,
            no_input,
        } => handle_add(ctx, username, name.as_deref(), *admin, *no_input).await,
        UserCommand::List { json } => handle_list(ctx, *json).await,
        UserCommand::Show { username, json } => handle_show(ctx, username, *json).await,
        UserCommand::Edit(args) => handle_edit(ctx, args).await,
    }
}

async fn handle_add(
    ctx: &AppContext<'_>,
    username: &str,
    name: Option<&str>,
    admin: bool,
    no_input: bool,
) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    let password = read_password(ctx.interactive(no_input), true)?;
    let user = db
        .accounts()
        .create_user(username, name.unwrap_or(username), &password, admin)
        .await?;
    db.close().await?;

    if !ctx.quiet() {
        println!("Added user {}", user.username);
    }
    Ok(())
}

async fn handle_list(ctx: &AppContext<'_>, json: bool) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    let users = db.view().all_sanitized_users()?;
    if json {
        print_json(&users)?;
    } else if users.is_empty() {
        if !ctx.quiet() {
            println!("No users.");
        }
    } else {
        println!("{}", users_table(&users));
    }
    Ok(())
}

async fn handle_show(ctx: &AppContext<'_>, username: &str, json: bool) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    let content = db.view().authored_by(username)?.unwrap_or_else(|| {
        exit_not_found_with_hint(
            &format!("User {} not found", username),
            "Hint: Run `quire user list` to see usernames.",
        )
    });
    if json {
        print_json(&content)?;
    } else {
        print_authored(&content, ctx.quiet());
    }
    Ok(())
}

async fn handle_edit(ctx: &AppContext<'_>, args: &UserEditArgs) -> anyhow::Result<()> {
    let mut edit = UserEdit::new();
    if let Some(name) = &args.name {
        edit = edit.name(name.clone());
    }
    if let Some(avatar) = &args.avatar {
        edit = edit.avatar(Some(avatar.clone()));
    }
    if args.clear_avatar {
        edit = edit.avatar(None);
    }
    if let Some(admin) = args.admin {
        edit = edit.admin(admin);
    }
    if args.password {
        let password = read_password(ctx.interactive(args.no_input), true)?;
        edit = edit.password(password.to_string());
    }

    let db = ctx.open_database().await?;
    let user = db.accounts().edit_user(&args.username, edit).await?;
    db.close().await?;

    if !ctx.quiet() {
        println!("Updated user {}", user.username);
    }
    Ok(())
}

pub async fn handle_login(ctx: &AppContext<'_>, args: &LoginArgs) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    let password = read_password(ctx.interactive(args.no_input), false)?;
    let state = db.authenticator().login(&args.username, &password).await?;
    let Some(session) = state.session() else {
        tracing::warn!(username = %args.username, "Login rejected");
        return Err(CliError::auth_failed("Invalid username or password").into());
    };
    tracing::debug!(username = %args.username, "Login accepted");

    if args.json {
        print_json(session)?;
    } else if !ctx.quiet() {
        let role = if quire_core::is_admin(session) {
            "admin"
        } else {
            "user"
        };
        println!("Authenticated as {} ({})", args.username, role);
    }
    Ok(())
}
