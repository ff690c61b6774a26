use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use sayho_core::{errors::Error, secrets::TokenStore, Result};

const CURRENT_VERSION: u32 = 1;

/// Keeps the session token in a JSON file between runs.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct StoredTokens {
    version: u32,
    tokens: HashMap<String, String>,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn with_store<F>(&self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut HashMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::TokenStore("Token store lock poisoned".into()))?;
        // A file we cannot parse holds nothing worth keeping; overwrite it.
        let mut tokens = match self.read_raw_locked()? {
            Some(raw) => parse_tokens(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable token file {}: {}", self.path.display(), e);
                HashMap::new()
            }),
            None => HashMap::new(),
        };
        op(&mut tokens);
        self.persist_locked(tokens)
    }

    fn read_store(&self) -> Result<HashMap<String, String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::TokenStore("Token store lock poisoned".into()))?;
        self.load_locked()
    }

    fn load_locked(&self) -> Result<HashMap<String, String>> {
        match self.read_raw_locked()? {
            Some(raw) => parse_tokens(&raw),
            None => Ok(HashMap::new()),
        }
    }

    /// File contents, or `None` when the file is missing or blank.
    fn read_raw_locked(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&self.path)?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn persist_locked(&self, tokens: HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredTokens {
            version: CURRENT_VERSION,
            tokens,
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| Error::TokenStore(format!("Failed to encode token file: {e}")))?;
        write_private(&self.path, json.as_bytes())
    }
}

fn parse_tokens(raw: &[u8]) -> Result<HashMap<String, String>> {
    let stored: StoredTokens = serde_json::from_slice(raw)
        .map_err(|e| Error::TokenStore(format!("Unreadable token file: {e}")))?;
    Ok(stored.tokens)
}

/// Writes `contents` to a file only the current user can read.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten files left by older versions.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn set_token(&self, key: &str, token: &str) -> Result<()> {
        self.with_store(|tokens| {
            tokens.insert(key.to_string(), token.to_string());
        })
    }

    fn get_token(&self, key: &str) -> Result<Option<String>> {
        let tokens = self.read_store()?;
        Ok(tokens.get(key).cloned())
    }

    fn clear_token(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.with_store(|tokens| {
            tokens.remove(key);
        })
    }
}

pub fn build_token_store(path: PathBuf) -> FileTokenStore {
    FileTokenStore::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(file.clone());

        assert!(store.get_token("access_token").unwrap().is_none());

        store.set_token("access_token", "abc").unwrap();
        assert_eq!(
            store.get_token("access_token").unwrap().as_deref(),
            Some("abc")
        );
        assert!(file.exists());

        store.clear_token("access_token").unwrap();
        assert!(store.get_token("access_token").unwrap().is_none());
    }

    #[test]
    fn survives_a_new_instance() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");

        FileTokenStore::new(file.clone())
            .set_token("access_token", "persisted")
            .unwrap();

        let reopened = FileTokenStore::new(file);
        assert_eq!(
            reopened.get_token("access_token").unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[test]
    fn empty_file_means_no_token() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");
        fs::write(&file, "").unwrap();

        let store = FileTokenStore::new(file);
        assert!(store.get_token("access_token").unwrap().is_none());
    }

    #[test]
    fn clearing_without_file_does_not_create_it() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");
        let store = FileTokenStore::new(file.clone());

        store.clear_token("access_token").unwrap();
        assert!(!file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");
        fs::write(&file, "").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStore::new(file.clone())
            .set_token("access_token", "secret")
            .unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");
        fs::write(&file, "{not json").unwrap();
        let store = FileTokenStore::new(file);

        store.clear_token("access_token").unwrap();
        assert!(store.get_token("access_token").unwrap().is_none());

        store.set_token("access_token", "fresh").unwrap();
        assert_eq!(
            store.get_token("access_token").unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[test]
    fn corrupt_file_is_a_token_store_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("session.json");
        fs::write(&file, "{not json").unwrap();

        let store = FileTokenStore::new(file);
        assert!(matches!(
            store.get_token("access_token"),
            Err(Error::TokenStore(_))
        ));
    }

    mod session {
        use super::*;
        use async_trait::async_trait;
        use std::sync::Arc;

        use sayho_connect::{AuthApi, SessionContext, SessionManager, SessionState};
        use sayho_core::users::{AccessToken, NewUser, PasswordUpdate, User, UserUpdate};

        struct SingleUserAuthApi;

        fn ana() -> User {
            User {
                id: 1,
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                theme_preference: None,
                created_at: "2024-05-01T10:00:00".to_string(),
            }
        }

        #[async_trait]
        impl AuthApi for SingleUserAuthApi {
            async fn signup(&self, _new_user: &NewUser) -> Result<User> {
                Err(Error::AccountCreationFailed("closed".to_string()))
            }

            async fn login(&self, _username: &str, password: &str) -> Result<AccessToken> {
                if password != "right-password" {
                    return Err(Error::InvalidCredentials);
                }
                Ok(AccessToken {
                    access_token: "fresh".to_string(),
                    token_type: "bearer".to_string(),
                })
            }

            async fn fetch_current_user(&self, token: &str) -> Result<User> {
                if token == "fresh" {
                    Ok(ana())
                } else {
                    Err(Error::SessionExpired)
                }
            }

            async fn update_profile(&self, _token: &str, _update: &UserUpdate) -> Result<User> {
                Err(Error::SessionExpired)
            }

            async fn change_password(&self, _token: &str, _update: &PasswordUpdate) -> Result<()> {
                Err(Error::SessionExpired)
            }
        }

        #[tokio::test]
        async fn corrupt_file_does_not_block_login() {
            let dir = tempdir().unwrap();
            let file = dir.path().join("session.json");
            fs::write(&file, "{not json").unwrap();
            let store = Arc::new(FileTokenStore::new(file.clone()));
            let context = Arc::new(SessionContext::new(store.clone()));
            let manager = SessionManager::new(Arc::new(SingleUserAuthApi), context);

            assert_eq!(manager.bootstrap().await, SessionState::Anonymous);

            let user = manager
                .login_with_credentials("ana@example.com", "right-password")
                .await
                .unwrap();
            assert_eq!(user, ana());
            assert_eq!(
                store.get_token("access_token").unwrap().as_deref(),
                Some("fresh")
            );

            let reopened = FileTokenStore::new(file);
            assert_eq!(
                reopened.get_token("access_token").unwrap().as_deref(),
                Some("fresh")
            );
        }
    }
}
