use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::store::{StoreError, StoreResult};
use crate::models::User;

const MIN_PASSWORD_LEN: usize = 6;

/// File-backed account store. The whole map is read once at startup and
/// rewritten on every mutation; the write goes to a temp file in the
/// target directory followed by a rename, so a crash mid-write leaves
/// the previous file intact.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    path: Arc<PathBuf>,
}

impl UserStore {
    /// Load the store from disk. A missing file is an empty store; a
    /// file that exists but does not parse is an error.
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let users = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Loaded {} account(s) from {}", users.len(), path.display());
        Ok(Self {
            users: Arc::new(RwLock::new(users)),
            path: Arc::new(path),
        })
    }

    /// Create an account. Validation failures and duplicates leave the
    /// store untouched.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> StoreResult<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::MissingCredentials);
        }
        if password != confirm_password {
            return Err(StoreError::PasswordMismatch);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(StoreError::PasswordTooShort(MIN_PASSWORD_LEN));
        }

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::DuplicateUser);
        }

        let user = User {
            username: username.to_string(),
            password_hash: hash(password.as_bytes(), DEFAULT_COST)?,
            created_at: Utc::now(),
            analyses_count: 0,
        };
        users.insert(username.to_string(), user.clone());
        self.persist(&users)?;

        Ok(user)
    }

    /// Check credentials. Unknown username and wrong password are
    /// distinct failures.
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::MissingCredentials);
        }

        let users = self.users.read().await;
        let user = users.get(username).ok_or(StoreError::UnknownUser)?;
        if verify(password.as_bytes(), &user.password_hash)? {
            Ok(user.clone())
        } else {
            Err(StoreError::WrongPassword)
        }
    }

    pub async fn get(&self, username: &str) -> Option<User> {
        self.users.read().await.get(username).cloned()
    }

    /// Bump the analysis counter for one user and persist. Called
    /// exactly once per successful analysis.
    pub async fn record_analysis(&self, username: &str) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        let user = users.get_mut(username).ok_or(StoreError::UnknownUser)?;
        user.analyses_count += 1;
        let count = user.analyses_count;
        self.persist(&users)?;
        Ok(count)
    }

    fn persist(&self, users: &HashMap<String, User>) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, users)?;
        tmp.flush()?;
        tmp.persist(self.path.as_ref())
            .map_err(|e| StoreError::Persist(e.to_string()))?;

        tracing::debug!(
            "Persisted {} account(s) to {}",
            users.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> UserStore {
        UserStore::load(dir.join("users.json")).unwrap()
    }

    #[tokio::test]
    async fn signup_then_login_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.signup("alice", "secret1", "secret1").await.unwrap();
        let user = store.authenticate("alice", "secret1").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.analyses_count, 0);
        assert_ne!(user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn wrong_password_is_not_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.signup("alice", "secret1", "secret1").await.unwrap();

        assert!(matches!(
            store.authenticate("alice", "wrong-password").await,
            Err(StoreError::WrongPassword)
        ));
        assert!(matches!(
            store.authenticate("nobody", "secret1").await,
            Err(StoreError::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn duplicate_signup_keeps_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = UserStore::load(&path).unwrap();

        store.signup("alice", "secret1", "secret1").await.unwrap();
        assert!(matches!(
            store.signup("alice", "other-password", "other-password").await,
            Err(StoreError::DuplicateUser)
        ));

        // the original record survives, on disk as well as in memory
        let reloaded = UserStore::load(&path).unwrap();
        let user = reloaded.get("alice").await.unwrap();
        assert!(verify(b"secret1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn signup_validation_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(matches!(
            store.signup("", "secret1", "secret1").await,
            Err(StoreError::MissingCredentials)
        ));
        assert!(matches!(
            store.signup("alice", "", "").await,
            Err(StoreError::MissingCredentials)
        ));
        assert!(matches!(
            store.signup("alice", "secret1", "secret2").await,
            Err(StoreError::PasswordMismatch)
        ));
        assert!(matches!(
            store.signup("alice", "short", "short").await,
            Err(StoreError::PasswordTooShort(6))
        ));
        assert!(store.get("alice").await.is_none());
    }

    #[tokio::test]
    async fn analysis_counter_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = UserStore::load(&path).unwrap();

        store.signup("bob", "secret1", "secret1").await.unwrap();
        assert_eq!(store.record_analysis("bob").await.unwrap(), 1);
        assert_eq!(store.record_analysis("bob").await.unwrap(), 2);

        let reloaded = UserStore::load(&path).unwrap();
        assert_eq!(reloaded.get("bob").await.unwrap().analyses_count, 2);
    }

    #[tokio::test]
    async fn store_file_is_a_json_object_keyed_by_username() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = UserStore::load(&path).unwrap();
        store.signup("carol", "secret1", "secret1").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed["carol"]["password_hash"].is_string());
        assert_eq!(parsed["carol"]["analyses_count"], 0);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.get("anyone").await.is_none());
    }
}
