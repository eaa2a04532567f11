//! Client-side persistence of the session credential.
//!
//! The store only tracks presence. It never inspects expiry and never clears
//! itself; callers clear it on logout or when the server refuses the
//! credential.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::ClientError;

/// Storage key the credential is persisted under.
pub const SESSION_KEY: &str = "sessionToken";

/// Backing storage for the session credential. Swap in
/// `MemorySessionRepository` for tests.
pub trait SessionRepository {
    fn save(&mut self, credential: &str) -> Result<(), ClientError>;
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn clear(&mut self) -> Result<(), ClientError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionRepository {
    credential: Option<String>,
}

impl SessionRepository for MemorySessionRepository {
    fn save(&mut self, credential: &str) -> Result<(), ClientError> {
        self.credential = Some(credential.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.credential.clone())
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        self.credential = None;
        Ok(())
    }
}

/// Persists the credential in a small JSON key/value file, alongside any
/// other keys already stored there.
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    path: PathBuf,
}

impl FileSessionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&mut self, credential: &str) -> Result<(), ClientError> {
        let mut entries = self.read_entries()?;
        entries.insert(SESSION_KEY.to_string(), credential.to_string());
        self.write_entries(&entries)?;
        debug!("Saved session credential to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.read_entries()?.remove(SESSION_KEY))
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        let mut entries = self.read_entries()?;
        if entries.remove(SESSION_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// The session credential held by this client, plus the derived
/// authenticated flag.
#[derive(Debug, Clone)]
pub struct ClientSession<R> {
    repo: R,
}

impl<R: SessionRepository> ClientSession<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn save(&mut self, credential: &str) -> Result<(), ClientError> {
        self.repo.save(credential)
    }

    pub fn load(&self) -> Result<Option<String>, ClientError> {
        self.repo.load()
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.repo.clear()
    }

    /// True when a credential is stored. Expiry is deliberately not checked
    /// here; the server is the only judge of validity.
    pub fn is_authenticated(&self) -> bool {
        match self.repo.load() {
            Ok(credential) => credential.is_some_and(|c| !c.is_empty()),
            Err(e) => {
                warn!("Could not read session storage: {e}");
                false
            }
        }
    }
}
