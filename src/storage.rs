//! Collaborator boundaries: persistence and remote provisioning.
//!
//! The core does not assume a storage medium or a transport. The UI (or
//! CLI) supplies a [`ProjectStorage`] to persist documents by key and a
//! [`WorkspaceClient`] to push a compiled bundle to a provisioning
//! workspace. Only the filesystem storage lives here; no transport is
//! implemented - remote provisioning is consumed behind the trait.

use crate::core::ForgeError;
use anyhow::Result;
use std::path::PathBuf;

/// Opaque key-value persistence for configuration documents.
pub trait ProjectStorage {
    /// Load a document blob by key; `None` when the key has never been
    /// stored.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store a document blob under a key, replacing any previous value.
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Request/response interface to a remote provisioning workspace.
///
/// Failure leaves the local document untouched; retrying is the caller's
/// concern.
pub trait WorkspaceClient {
    /// Create (or look up) a workspace, returning its identifier.
    fn create_workspace(
        &mut self,
        name: &str,
        region: Option<&str>,
        resource_group: Option<&str>,
    ) -> Result<String>;
}

/// Filesystem-backed [`ProjectStorage`]: one JSON file per key inside a
/// directory.
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Storage rooted at `root`; the directory is created on first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl ProjectStorage for DirectoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| ForgeError::OutputWriteError {
            path: self.root.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| {
            ForgeError::OutputWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory provisioning double used by tests.
    struct FakeWorkspaces {
        created: Vec<String>,
    }

    impl WorkspaceClient for FakeWorkspaces {
        fn create_workspace(
            &mut self,
            name: &str,
            _region: Option<&str>,
            _resource_group: Option<&str>,
        ) -> Result<String> {
            self.created.push(name.to_string());
            Ok(format!("ws-{name}"))
        }
    }

    #[test]
    fn workspace_client_round_trip() {
        let mut client = FakeWorkspaces { created: Vec::new() };
        let id = client.create_workspace("landing-zone", None, None).unwrap();
        assert_eq!(id, "ws-landing-zone");
        assert_eq!(client.created, ["landing-zone"]);
    }
}
