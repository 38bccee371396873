use quire_core::storage::{ArticlePatch, CommentPatch, NewArticle, NewComment, NewLogEntry};
use quire_core::{QuireError, SettingsUpdate};

use crate::helpers::{install_request, installed, open_memory, STRONG_PASSWORD};

#[tokio::test]
async fn test_install_writes_settings_and_admin() {
    let db = installed(true, false).await;
    let site = db.site();
    assert!(site.is_installed().unwrap());

    let settings = site.settings().unwrap();
    assert_eq!(settings.title.as_deref(), Some("My Quire"));
    assert_eq!(settings.description.as_deref(), Some("Notes and essays"));
    assert!(settings.init);
    assert!(settings.comments_enabled);
    assert!(!settings.registration_enabled);

    let admin = db.view().sanitized_user("root").unwrap().unwrap();
    assert!(admin.admin);
    assert!(db.authenticator().authenticate("root", STRONG_PASSWORD).await.unwrap());
    assert_eq!(db.articles().count().unwrap(), 0);
}

#[tokio::test]
async fn test_second_install_is_refused() {
    let db = installed(false, false).await;
    let err = db
        .site()
        .install(install_request(true, true))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::AlreadyInstalled));
    assert_eq!(db.users().count().unwrap(), 1);
    assert!(!db.site().settings().unwrap().comments_enabled);
}

#[tokio::test]
async fn test_install_refused_when_any_user_exists() {
    let db = open_memory().await;
    db.accounts()
        .create_user("early", "Early Bird", STRONG_PASSWORD, false)
        .await
        .unwrap();
    let err = db
        .site()
        .install(install_request(true, false))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::AlreadyInstalled));
}

#[tokio::test]
async fn test_install_requires_field_lengths() {
    let db = open_memory().await;
    let mut request = install_request(true, false);
    request.title = "ab".to_string();

    let err = db.site().install(request).await.unwrap_err();
    assert!(matches!(err, QuireError::InvalidInput(ref msg) if msg.contains("title")));
    assert!(!db.site().is_installed().unwrap());
}

#[tokio::test]
async fn test_install_with_weak_password_stays_uninstalled() {
    let db = open_memory().await;
    let mut request = install_request(true, false);
    request.password = "abcde".to_string();

    let err = db.site().install(request).await.unwrap_err();
    assert!(matches!(err, QuireError::WeakCredential { .. }));
    assert!(!db.site().is_installed().unwrap());
}

#[tokio::test]
async fn test_install_seeds_examples() {
    let db = installed(true, true).await;
    let articles = db.view().hydrated_articles(true).unwrap();
    assert_eq!(articles.len(), 1);

    let article = &articles[0];
    assert!(article.article.published);
    assert_eq!(article.account.as_ref().unwrap().username, "root");
    assert_eq!(article.comments.len(), 1);
    assert_eq!(article.comments[0].comment.parent.id(), article.article.id);
}

#[tokio::test]
async fn test_articles_start_unpublished_and_toggle() {
    let db = installed(false, false).await;
    let site = db.site();
    let first = site
        .create_article(NewArticle::new("First", "Body *one*", "root"))
        .unwrap();
    let second = site
        .create_article(NewArticle::new("Second", "Body two", "root"))
        .unwrap();
    assert!(!first.published);
    assert_ne!(first.id, second.id);

    let view = db.view();
    assert!(view.hydrated_articles(true).unwrap().is_empty());
    assert_eq!(view.hydrated_articles(false).unwrap().len(), 2);

    site.publish(second.id).unwrap();
    let published = view.hydrated_articles(true).unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].article.title, "Second");

    site.unpublish(second.id).unwrap();
    assert!(view.hydrated_articles(true).unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_article_and_missing_id() {
    let db = installed(false, false).await;
    let site = db.site();
    let article = site
        .create_article(NewArticle::new("Draft", "Old", "root"))
        .unwrap();

    let edited = site
        .edit_article(article.id, ArticlePatch::new().title("Final").content("New"))
        .unwrap();
    assert_eq!(edited.title, "Final");
    assert_eq!(edited.content, "New");
    assert_eq!(edited.date, article.date);

    let err = site.publish(999).unwrap_err();
    assert!(matches!(err, QuireError::NotFound(_)));
    assert!(!db.articles().has(&999).unwrap());
}

#[tokio::test]
async fn test_comments_disabled_blocks_new_comments() {
    let db = installed(false, false).await;
    let site = db.site();
    let article = site
        .create_article(NewArticle::new("Post", "Body", "root").published(true))
        .unwrap();

    let err = site
        .add_comment(NewComment::new(article.id, "Hi", "root"))
        .unwrap_err();
    assert!(matches!(err, QuireError::CommentsDisabled));
    assert_eq!(db.comments().count().unwrap(), 0);
}

#[tokio::test]
async fn test_comment_on_missing_article_is_not_found() {
    let db = installed(true, false).await;
    let err = db
        .site()
        .add_comment(NewComment::new(42, "Hello?", "root"))
        .unwrap_err();
    assert!(matches!(err, QuireError::NotFound(_)));
    assert_eq!(db.comments().count().unwrap(), 0);
}

#[tokio::test]
async fn test_comments_edit_delete_and_dangle() {
    let db = installed(true, false).await;
    let site = db.site();
    let article = site
        .create_article(NewArticle::new("Post", "Body", "root").published(true))
        .unwrap();
    let keep = site
        .add_comment(NewComment::new(article.id, "first", "root"))
        .unwrap();
    let dropped = site
        .add_comment(NewComment::new(article.id, "second", "root"))
        .unwrap();

    let edited = site
        .edit_comment(keep.id, CommentPatch { content: Some("**first**".to_string()) })
        .unwrap();
    assert_eq!(edited.content, "**first**");
    assert!(site.delete_comment(dropped.id).unwrap());
    assert!(!site.delete_comment(dropped.id).unwrap());

    let view = db.view();
    let comments = view.hydrated_comments_for(article.id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].rendered, "<p><strong>first</strong></p>\n");

    // Deleting the article leaves its comment behind.
    assert!(site.delete_article(article.id).unwrap());
    let orphan = view.hydrated_comment(keep.id).unwrap().unwrap();
    assert!(view.resolve_article(orphan.comment.parent).unwrap().is_none());
}

#[tokio::test]
async fn test_update_settings_and_free_form_keys() {
    let db = installed(false, false).await;
    let site = db.site();
    site.update_settings(SettingsUpdate {
        title: "Renamed".to_string(),
        description: "Elsewhere".to_string(),
        author: "Someone".to_string(),
        comments_enabled: true,
        registration_enabled: true,
    })
    .unwrap();
    site.set_setting("theme", "dark").unwrap();

    let settings = site.settings().unwrap();
    assert_eq!(settings.title.as_deref(), Some("Renamed"));
    assert!(settings.comments_enabled);
    assert!(settings.registration_enabled);
    assert_eq!(
        settings.extra.get("theme").and_then(|v| v.as_str()),
        Some("dark")
    );
    assert_eq!(
        site.setting("theme").unwrap().unwrap().as_str(),
        Some("dark")
    );
    assert!(site.setting("missing").unwrap().is_none());
}

#[tokio::test]
async fn test_visit_log_keeps_order() {
    let db = open_memory().await;
    let site = db.site();
    site.record_visit(NewLogEntry::new("10.0.0.1", "/").with_agent("curl/8"))
        .unwrap();
    site.record_visit(NewLogEntry::new("10.0.0.2", "/article/1"))
        .unwrap();

    let logs = site.logs().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].page, "/");
    assert_eq!(logs[0].agent.as_deref(), Some("curl/8"));
    assert_eq!(logs[1].ip, "10.0.0.2");
    assert!(logs[0].id < logs[1].id);
}

#[tokio::test]
async fn test_authored_by_lists_user_content() {
    let db = installed(true, true).await;
    let content = db.view().authored_by("root").unwrap().unwrap();
    assert_eq!(content.user.username, "root");
    assert_eq!(content.articles.len(), 1);
    assert_eq!(content.comments.len(), 1);
    assert!(db.view().authored_by("nobody").unwrap().is_none());
}
