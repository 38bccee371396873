use quire_core::storage::{ArticlePatch, NewArticle};

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::ArticleCommand;
use crate::errors::CliError;
use crate::helpers::{parse_datetime, read_body};
use crate::output::{articles_table, print_article, print_json};

const LIST_HINT: &str = "Hint: Run `quire article list` to find article IDs.";

pub async fn handle_article(ctx: &AppContext<'_>, command: &ArticleCommand) -> anyhow::Result<()> {
    match command {
        ArticleCommand::Add {
            title,
            author,
            body,
            publish,
            date,
        } => {
            let content = read_body(body.clone())?;
            let mut new =
                NewArticle::new(title.clone(), content, author.clone()).published(*publish);
            if let Some(value) = date {
                new = new.with_date(parse_datetime(value)?);
            }

            let db = ctx.open_database().await?;
            let article = db.site().create_article(new)?;
            db.close().await?;
            if !ctx.quiet() {
                println!("Added article {}", article.id);
            }
        }
        ArticleCommand::List { published, json } => {
            let db = ctx.open_database().await?;
            let articles = db.view().hydrated_articles(*published)?;
            if *json {
                print_json(&articles)?;
            } else if articles.is_empty() {
                if !ctx.quiet() {
                    println!("No articles.");
                }
            } else {
                println!("{}", articles_table(&articles));
            }
        }
        ArticleCommand::Show { id, json } => {
            let db = ctx.open_database().await?;
            let view = db.view().hydrated_article(*id)?.unwrap_or_else(|| {
                exit_not_found_with_hint(&format!("Article {} not found", id), LIST_HINT)
            });
            if *json {
                print_json(&view)?;
            } else {
                print_article(&view, ctx.quiet());
            }
        }
        ArticleCommand::Edit { id, title, body } => {
            if title.is_none() && body.is_none() {
                return Err(
                    CliError::invalid_input("Nothing to change. Use --title or --body.").into(),
                );
            }
            let mut patch = ArticlePatch::new();
            if let Some(title) = title {
                patch = patch.title(title.clone());
            }
            if let Some(body) = body {
                patch = patch.content(body.clone());
            }
            let db = ctx.open_database().await?;
            let article = db.site().edit_article(*id, patch)?;
            db.close().await?;
            if !ctx.quiet() {
                println!("Updated article {}", article.id);
            }
        }
        ArticleCommand::Publish { id } => {
            let db = ctx.open_database().await?;
            db.site().publish(*id)?;
            db.close().await?;
            if !ctx.quiet() {
                println!("Published article {}", id);
            }
        }
        ArticleCommand::Unpublish { id } => {
            let db = ctx.open_database().await?;
            db.site().unpublish(*id)?;
            db.close().await?;
            if !ctx.quiet() {
                println!("Unpublished article {}", id);
            }
        }
        ArticleCommand::Delete { id } => {
            let db = ctx.open_database().await?;
            let removed = db.site().delete_article(*id)?;
            db.close().await?;
            if !removed {
                exit_not_found_with_hint(&format!("Article {} not found", id), LIST_HINT);
            }
            if !ctx.quiet() {
                println!("Deleted article {}", id);
            }
        }
    }
    Ok(())
}
