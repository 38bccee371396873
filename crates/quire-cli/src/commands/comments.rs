use quire_core::storage::NewComment;

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::CommentCommand;
use crate::helpers::read_body;

pub async fn handle_comment(ctx: &AppContext<'_>, command: &CommentCommand) -> anyhow::Result<()> {
    match command {
        CommentCommand::Add {
            article,
            author,
            body,
        } => {
            let content = read_body(body.clone())?;
            let db = ctx.open_database().await?;
            let comment = db
                .site()
                .add_comment(NewComment::new(*article, content, author.clone()))?;
            db.close().await?;
            if !ctx.quiet() {
                println!("Added comment {} on article {}", comment.id, comment.parent);
            }
        }
        CommentCommand::Delete { id } => {
            let db = ctx.open_database().await?;
            let removed = db.site().delete_comment(*id)?;
            db.close().await?;
            if !removed {
                exit_not_found_with_hint(
                    &format!("Comment {} not found", id),
                    "Hint: Run `quire article show <ID>` to see comment IDs.",
                );
            }
            if !ctx.quiet() {
                println!("Deleted comment {}", id);
            }
        }
    }
    Ok(())
}
