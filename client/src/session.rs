use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shared::types::TokenPair;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key of the bearer token every guarded page requires.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the refresh token written alongside it at login.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Persistent key/value storage for session tokens.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    /// Drop every key.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local store, used by tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(token: &str) -> Self {
        let store = Self::new();
        store
            .lock()
            .insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.lock().clear();
        Ok(())
    }
}

/// JSON file store: the whole map is rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// and its parent directory are created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", path.display());
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
        self.persist(&entries)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Tokens read from the store once per page load.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Load the session, or `None` when no access token is stored.
    /// An empty value counts as absent.
    pub fn load(store: &dyn SessionStore) -> Option<Self> {
        let access_token = store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let refresh_token = store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty());
        Some(Self {
            access_token,
            refresh_token,
        })
    }

    /// Persist both tokens of a login or refresh response.
    pub fn save(store: &dyn SessionStore, tokens: &TokenPair) -> Result<Self, SessionError> {
        store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        info!("Session tokens stored");
        Ok(Self {
            access_token: tokens.access_token.clone(),
            refresh_token: Some(tokens.refresh_token.clone()),
        })
    }

    /// Remove every persisted key.
    pub fn clear(store: &dyn SessionStore) -> Result<(), SessionError> {
        store.clear().map_err(|e| {
            warn!("Failed to clear session storage: {}", e);
            e
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    #[test]
    fn load_without_token_is_none() {
        let store = MemoryStore::new();
        assert!(Session::load(&store).is_none());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let store = MemoryStore::with_access_token("");
        assert!(Session::load(&store).is_none());
    }

    #[test]
    fn save_writes_both_keys() {
        let store = MemoryStore::new();
        let session = Session::save(&store, &pair()).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref"));
        assert_eq!(session.refresh_token(), Some("ref"));
    }

    #[test]
    fn clear_removes_every_key() {
        let store = MemoryStore::new();
        Session::save(&store, &pair()).unwrap();
        store.set("theme", "dark").unwrap();
        Session::clear(&store).unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
        assert!(store.get("theme").is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::new("super-secret");
        let printed = format!("{:?}", session);
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).unwrap();
        Session::save(&store, &pair()).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        let session = Session::load(&reopened).unwrap();
        assert_eq!(session.access_token(), "acc");
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(SessionError::Json(_))));
    }
}
