use quire_core::{Config, CredentialConfig, Database, InstallRequest, StoreConfig};

/// Scores well above the strength gate.
pub const STRONG_PASSWORD: &str = "Tr0ub4dor&3";

pub fn test_config() -> Config {
    Config::in_memory().with_credentials(CredentialConfig::insecure_fast())
}

pub fn file_config(store: StoreConfig) -> Config {
    test_config().with_store(store)
}

pub async fn open_memory() -> Database {
    Database::open(test_config())
        .await
        .expect("in-memory database should open")
}

pub fn install_request(comments_enabled: bool, examples: bool) -> InstallRequest {
    InstallRequest {
        username: "root".to_string(),
        name: "Site Owner".to_string(),
        password: STRONG_PASSWORD.to_string(),
        title: "My Quire".to_string(),
        description: "Notes and essays".to_string(),
        author: "Site Owner".to_string(),
        comments_enabled,
        registration_enabled: false,
        examples,
    }
}

/// An in-memory database with the site installed.
pub async fn installed(comments_enabled: bool, examples: bool) -> Database {
    let db = open_memory().await;
    db.site()
        .install(install_request(comments_enabled, examples))
        .await
        .expect("install should succeed");
    db
}
