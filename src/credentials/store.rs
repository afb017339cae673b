//! Credential storage and decryption seams.
//!
//! The encrypted store and the cipher belong to the host application. This
//! module defines the traits the resolver consumes plus two local stores used
//! by the CLI and tests.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Errors raised by credential collaborators.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential store error: {0}")]
    Store(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("credential payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Encrypted credential storage keyed by organisation and provider.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the encrypted blob, if any.
    async fn get(&self, org_id: &str, provider: &str) -> Result<Option<String>, CredentialError>;
}

/// Turns an encrypted blob into plaintext JSON.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, blob: &str) -> Result<String, CredentialError>;
}

/// Treats the stored blob as plaintext.
///
/// For local development and tests only; production hosts supply their own cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDecryptor;

impl Decryptor for PassthroughDecryptor {
    fn decrypt(&self, blob: &str) -> Result<String, CredentialError> {
        Ok(blob.to_string())
    }
}

/// A thread-safe in-memory credential store.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<DashMap<(String, String), String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the blob for an organisation/provider pair.
    pub fn insert(&self, org_id: &str, provider: &str, blob: impl Into<String>) {
        self.inner
            .insert((org_id.to_string(), provider.to_string()), blob.into());
    }

    pub fn remove(&self, org_id: &str, provider: &str) {
        self.inner.remove(&(org_id.to_string(), provider.to_string()));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, org_id: &str, provider: &str) -> Result<Option<String>, CredentialError> {
        Ok(self
            .inner
            .get(&(org_id.to_string(), provider.to_string()))
            .map(|r| r.value().clone()))
    }
}

/// Credential store backed by a JSON file.
///
/// The file holds `{ "<org>": { "<provider>": "<blob>" } }` and is read
/// again on every lookup, so no secret material is held between calls.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: String,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, HashMap<String, String>>, CredentialError> {
        if !Path::new(&self.path).exists() {
            return Ok(HashMap::new());
        }
        let file = File::open(&self.path)
            .map_err(|e| CredentialError::Store(format!("{}: {}", self.path, e)))?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, org_id: &str, provider: &str) -> Result<Option<String>, CredentialError> {
        let mut all = self.read_all()?;
        Ok(all
            .remove(org_id)
            .and_then(|mut providers| providers.remove(provider)))
    }
}
