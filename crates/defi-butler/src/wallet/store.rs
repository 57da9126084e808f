//! Wallet Export Stores
//!
//! Where the opaque wallet export lives between runs: a file for server
//! processes, a keyed in-memory map standing in for browser local storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::WalletError;

/// Key used by browser-side storage
pub const BROWSER_STORAGE_KEY: &str = "ailfred_wallet_data";

#[async_trait]
pub trait WalletExportStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    async fn load(&self) -> Result<Option<String>, WalletError>;

    async fn save(&self, export: &str) -> Result<(), WalletError>;
}

/// Export kept in a plain file
#[derive(Clone, Debug)]
pub struct FileWalletStore {
    path: PathBuf,
}

impl FileWalletStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WalletExportStore for FileWalletStore {
    async fn load(&self) -> Result<Option<String>, WalletError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WalletError::Store(format!(
                "reading {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, export: &str) -> Result<(), WalletError> {
        tokio::fs::write(&self.path, export)
            .await
            .map_err(|e| WalletError::Store(format!("writing {}: {e}", self.path.display())))
    }
}

/// Key/value store mirroring browser local storage
#[derive(Debug)]
pub struct MemoryWalletStore {
    key: String,
    entries: RwLock<HashMap<String, String>>,
}

impl Default for MemoryWalletStore {
    fn default() -> Self {
        Self::new(BROWSER_STORAGE_KEY)
    }
}

impl MemoryWalletStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl WalletExportStore for MemoryWalletStore {
    async fn load(&self) -> Result<Option<String>, WalletError> {
        Ok(self.get(&self.key).await)
    }

    async fn save(&self, export: &str) -> Result<(), WalletError> {
        self.entries
            .write()
            .await
            .insert(self.key.clone(), export.to_string());
        Ok(())
    }
}
