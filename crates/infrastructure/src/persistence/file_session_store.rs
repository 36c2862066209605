//! File-backed session store.
//!
//! The session lives in one JSON object keyed by the persistence keys
//! (`access_token`, `refresh_token`, `token_expires`, `user_id`,
//! `user_roles`, `institution_id`). Absent fields are omitted. Writes go
//! through a sibling temp file and a rename so a crash never leaves a
//! half-written session behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use campus_application::ports::{SessionStore, SessionStoreError};
use campus_domain::{Session, SessionContext};
use parking_lot::RwLock;

/// Session store persisted to a JSON file and cached in memory.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cache: RwLock<Session>,
}

impl FileSessionStore {
    /// Opens the store at `path`, loading the saved session if there is one.
    ///
    /// A missing file is an empty session.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let path = path.into();
        let session = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Session::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| SessionStoreError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Session::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), restored = !session.is_empty(), "session store opened");
        Ok(Self {
            path,
            cache: RwLock::new(session),
        })
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the session, persists it, then publishes
    /// it to readers. The cache is untouched when persisting fails.
    fn update(&self, change: impl FnOnce(&mut Session)) -> Result<(), SessionStoreError> {
        let mut cache = self.cache.write();
        let mut next = cache.clone();
        change(&mut next);
        self.persist(&next)?;
        *cache = next;
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<(), SessionStoreError> {
        if session.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_vec_pretty(session)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Session {
        self.cache.read().clone()
    }

    fn write_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at_millis: i64,
    ) -> Result<(), SessionStoreError> {
        self.update(|session| session.set_tokens(access_token, refresh_token, expires_at_millis))
    }

    fn write_context(&self, context: &SessionContext) -> Result<(), SessionStoreError> {
        self.update(|session| session.set_context(context))
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.update(|session| *session = Session::default())
    }
}
