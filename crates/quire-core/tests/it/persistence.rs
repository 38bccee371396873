use quire_core::storage::NewArticle;
use quire_core::{Database, Durability, StoreConfig};
use tempfile::tempdir;

use crate::helpers::{file_config, STRONG_PASSWORD};

#[tokio::test]
async fn test_immediate_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("site.db");

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    assert_eq!(db.durability(), Durability::Immediate);
    db.accounts()
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();
    db.site()
        .create_article(NewArticle::new("Kept", "Body", "alice"))
        .unwrap();
    db.close().await.unwrap();

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    assert!(db.users().has(&"alice".to_string()).unwrap());
    assert_eq!(db.articles().values().unwrap()[0].title, "Kept");
    assert!(db
        .authenticator()
        .authenticate("alice", STRONG_PASSWORD)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_article_ids_never_reused_after_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ids.db");

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    let site = db.site();
    let ids: Vec<u64> = (0..3)
        .map(|i| {
            site.create_article(NewArticle::new(format!("A{}", i), "x", "root"))
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    site.delete_article(3).unwrap();
    drop(site);
    db.close().await.unwrap();

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    let next = db
        .site()
        .create_article(NewArticle::new("After", "x", "root"))
        .unwrap();
    assert_eq!(next.id, 4);
}

#[tokio::test]
async fn test_allocator_skips_explicitly_written_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("explicit.db");

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    let article = db
        .site()
        .create_article(NewArticle::new("One", "x", "root"))
        .unwrap();
    let mut planted = article.clone();
    planted.id = 10;
    db.articles().set(&10, &planted).unwrap();
    db.close().await.unwrap();

    let db = Database::open(file_config(StoreConfig::at(&path))).await.unwrap();
    let next = db
        .site()
        .create_article(NewArticle::new("Next", "x", "root"))
        .unwrap();
    assert_eq!(next.id, 11);
}

#[tokio::test]
async fn test_buffered_store_persists_after_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("buffered.db");
    let store = StoreConfig::at(&path).durability(Durability::Buffered);

    let db = Database::open(file_config(store.clone())).await.unwrap();
    assert_eq!(db.durability(), Durability::Buffered);
    db.site()
        .create_article(NewArticle::new("Buffered", "x", "root"))
        .unwrap();
    db.flush().await.unwrap();
    assert!(path.exists());
    db.close().await.unwrap();

    let db = Database::open(file_config(store)).await.unwrap();
    assert_eq!(db.articles().count().unwrap(), 1);
    let next = db
        .site()
        .create_article(NewArticle::new("Second", "x", "root"))
        .unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test]
async fn test_buffered_store_loses_only_unflushed_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crash.db");
    let store = StoreConfig::at(&path).durability(Durability::Buffered);

    let db = Database::open(file_config(store.clone())).await.unwrap();
    db.site()
        .create_article(NewArticle::new("Flushed", "x", "root"))
        .unwrap();
    db.flush().await.unwrap();
    db.site()
        .create_article(NewArticle::new("Pending", "x", "root"))
        .unwrap();
    // Skip close and drop, as a killed process would.
    std::mem::forget(db);

    let db = Database::open(file_config(store)).await.unwrap();
    let titles: Vec<String> = db
        .articles()
        .values()
        .unwrap()
        .into_iter()
        .map(|article| article.title)
        .collect();
    assert_eq!(titles, vec!["Flushed".to_string()]);
    let next = db
        .site()
        .create_article(NewArticle::new("Recovered", "x", "root"))
        .unwrap();
    assert_eq!(next.id, 2);
}
