use quire_core::{is_admin, AuthState, QuireError, UserEdit};

use crate::helpers::{open_memory, STRONG_PASSWORD};

#[tokio::test]
async fn test_create_user_strips_hash_from_result() {
    let db = open_memory().await;
    let view = db
        .accounts()
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();
    assert_eq!(view.username, "alice");
    assert!(!view.admin);

    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("password_hash").is_none());

    let stored = db.users().get(&"alice".to_string()).unwrap().unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_ne!(stored.password_hash, STRONG_PASSWORD);
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let db = open_memory().await;
    let accounts = db.accounts();
    accounts
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();

    let err = accounts
        .create_user("alice", "Impostor", STRONG_PASSWORD, true)
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::DuplicateIdentity(ref name) if name == "alice"));

    let stored = db.users().get(&"alice".to_string()).unwrap().unwrap();
    assert_eq!(stored.name, "Alice");
    assert!(!stored.admin);
    assert_eq!(db.users().count().unwrap(), 1);
}

#[tokio::test]
async fn test_weak_password_leaves_no_record() {
    let db = open_memory().await;
    let err = db
        .accounts()
        .create_user("bob", "Bob", "abcde", false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuireError::WeakCredential {
            score: 25,
            minimum: 30
        }
    ));
    assert!(!db.users().has(&"bob".to_string()).unwrap());
}

#[tokio::test]
async fn test_authenticate_fails_closed() {
    let db = open_memory().await;
    db.accounts()
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();
    let auth = db.authenticator();

    assert!(auth.authenticate("alice", STRONG_PASSWORD).await.unwrap());
    assert!(!auth.authenticate("alice", "Tr0ub4dor&4").await.unwrap());
    assert!(!auth.authenticate("alice", "").await.unwrap());
    assert!(!auth.authenticate("nobody", STRONG_PASSWORD).await.unwrap());
    assert!(!auth.authenticate("nobody", "").await.unwrap());
}

#[tokio::test]
async fn test_login_records_session_fields() {
    let db = open_memory().await;
    db.accounts()
        .create_user("root", "Site Owner", STRONG_PASSWORD, true)
        .await
        .unwrap();

    let state = db.authenticator().login("root", STRONG_PASSWORD).await.unwrap();
    let session = state.session().expect("login should succeed");
    assert!(session.logged);
    assert_eq!(session.username.as_deref(), Some("root"));
    assert_eq!(session.name.as_deref(), Some("Site Owner"));
    assert!(is_admin(session));

    let state = db.authenticator().login("root", "wrong").await.unwrap();
    assert_eq!(state, AuthState::Rejected);
}

#[tokio::test]
async fn test_edit_user_changes_profile_and_password() {
    let db = open_memory().await;
    let accounts = db.accounts();
    accounts
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();

    let updated = accounts
        .edit_user(
            "alice",
            UserEdit::new()
                .name("Alice L.")
                .avatar(Some("https://example.com/a.png".to_string()))
                .password("N3w-Passphrase!"),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice L.");
    assert_eq!(updated.avatar.as_deref(), Some("https://example.com/a.png"));

    let auth = db.authenticator();
    assert!(!auth.authenticate("alice", STRONG_PASSWORD).await.unwrap());
    assert!(auth.authenticate("alice", "N3w-Passphrase!").await.unwrap());
}

#[tokio::test]
async fn test_edit_user_rejects_weak_password_without_writing() {
    let db = open_memory().await;
    let accounts = db.accounts();
    accounts
        .create_user("alice", "Alice", STRONG_PASSWORD, false)
        .await
        .unwrap();

    let err = accounts
        .edit_user("alice", UserEdit::new().name("Changed").password("aaa"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::WeakCredential { score: 8, .. }));

    let stored = db.users().get(&"alice".to_string()).unwrap().unwrap();
    assert_eq!(stored.name, "Alice");
    assert!(db.authenticator().authenticate("alice", STRONG_PASSWORD).await.unwrap());
}

#[tokio::test]
async fn test_edit_missing_user_is_not_found() {
    let db = open_memory().await;
    let err = db
        .accounts()
        .edit_user("ghost", UserEdit::new().admin(true))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::NotFound(_)));
    assert_eq!(db.users().count().unwrap(), 0);
}
