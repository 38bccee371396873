//! Text and table output.

use comfy_table::{Cell, ContentArrangement, Table};
use quire_core::storage::{LogEntry, SiteSettings};
use quire_core::{ArticleView, AuthoredContent, UserView};

const SUMMARY_MAX: usize = 60;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Borderless table with a header row.
fn simple_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn truncate(value: &str, max: usize) -> String {
    let first_line = value.lines().next().unwrap_or("");
    if first_line.chars().count() <= max {
        return first_line.to_string();
    }
    let mut truncated: String = first_line.chars().take(max.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

fn yes_no(value: bool) -> String {
    let word = if value { "yes" } else { "no" };
    word.to_string()
}

pub fn users_table(users: &[UserView]) -> String {
    let rows = users
        .iter()
        .map(|user| {
            vec![
                user.username.clone(),
                user.name.clone(),
                yes_no(user.admin),
                user.created.format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();
    simple_table(&["USERNAME", "NAME", "ADMIN", "CREATED"], rows)
}

pub fn articles_table(articles: &[ArticleView]) -> String {
    let rows = articles
        .iter()
        .map(|view| {
            vec![
                view.article.id.to_string(),
                truncate(&view.article.title, SUMMARY_MAX),
                view.article.user.to_string(),
                yes_no(view.article.published),
                view.comments.len().to_string(),
                view.article.date.format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();
    simple_table(
        &["ID", "TITLE", "AUTHOR", "PUBLISHED", "COMMENTS", "DATE"],
        rows,
    )
}

pub fn logs_table(entries: &[LogEntry]) -> String {
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                entry.time.format(DATE_FORMAT).to_string(),
                entry.ip.clone(),
                entry.page.clone(),
                entry.agent.clone().unwrap_or_default(),
            ]
        })
        .collect();
    simple_table(&["ID", "TIME", "IP", "PAGE", "AGENT"], rows)
}

/// Print an article, its body and its comments.
pub fn print_article(view: &ArticleView, quiet: bool) {
    let article = &view.article;
    if !quiet {
        println!("ID: {}", article.id);
        println!("Title: {}", article.title);
        match &view.account {
            Some(account) => println!("Author: {} ({})", account.name, account.username),
            None => println!("Author: {} (deleted)", article.user),
        }
        println!("Date: {}", article.date.format(DATE_FORMAT));
        println!("Published: {}", yes_no(article.published));
        println!();
    }
    println!("{}", article.content);
    if quiet || view.comments.is_empty() {
        return;
    }
    println!();
    println!("Comments ({}):", view.comments.len());
    for comment in &view.comments {
        let author = comment
            .account
            .as_ref()
            .map(|account| account.username.clone())
            .unwrap_or_else(|| format!("{} (deleted)", comment.comment.user));
        println!(
            "  #{} {} on {}: {}",
            comment.comment.id,
            author,
            comment.comment.date.format(DATE_FORMAT),
            truncate(&comment.comment.content, SUMMARY_MAX)
        );
    }
}

/// Print a user profile with what they wrote.
pub fn print_authored(content: &AuthoredContent, quiet: bool) {
    let user = &content.user;
    println!("Username: {}", user.username);
    if quiet {
        return;
    }
    println!("Name: {}", user.name);
    println!("Admin: {}", yes_no(user.admin));
    if let Some(avatar) = &user.avatar {
        println!("Avatar: {}", avatar);
    }
    println!("Created: {}", user.created.format(DATE_FORMAT));
    println!("Articles: {}", content.articles.len());
    for article in &content.articles {
        println!("  #{} {}", article.id, truncate(&article.title, SUMMARY_MAX));
    }
    println!("Comments: {}", content.comments.len());
    for comment in &content.comments {
        println!(
            "  #{} on article {}: {}",
            comment.id,
            comment.parent,
            truncate(&comment.content, SUMMARY_MAX)
        );
    }
}

pub fn print_settings(settings: &SiteSettings) {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    println!("title = {}", show(&settings.title));
    println!("description = {}", show(&settings.description));
    println!("author = {}", show(&settings.author));
    println!("init = {}", settings.init);
    println!("commentsEnabled = {}", settings.comments_enabled);
    println!("registrationEnabled = {}", settings.registration_enabled);
    for (key, value) in &settings.extra {
        println!("{} = {}", key, value);
    }
}
