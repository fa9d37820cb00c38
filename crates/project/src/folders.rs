use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use monolithium_settings::WORKSPACE_STATE_DIR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reconcile::OpenFolderEntry;
use crate::util::write_json_atomic;

pub const FOLDERS_FILE: &str = "folders.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct FolderStateFile {
    #[serde(default)]
    folders: Vec<OpenFolderEntry>,
}

/// Errors raised by folder-list persistence.
/// 資料夾清單儲存相關的錯誤。
#[derive(Debug, Error)]
pub enum FolderStateError {
    #[error("folder state IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid folder state {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persists the multi-root folder list of a workspace.
/// 保存工作區的多根資料夾清單。
///
/// Every save replaces the whole list; there is no diffing.
#[derive(Debug, Clone)]
pub struct FolderStateStore {
    path: PathBuf,
}

impl FolderStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `<workspace_root>/.monolithium/folders.json`.
    pub fn for_workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(
            workspace_root
                .as_ref()
                .join(WORKSPACE_STATE_DIR)
                .join(FOLDERS_FILE),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current folder list; a missing file is an empty list.
    pub fn load(&self) -> Result<Vec<OpenFolderEntry>, FolderStateError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(|file: FolderStateFile| file.folders)
                .map_err(|source| FolderStateError::Invalid {
                    path: self.path.clone(),
                    source,
                }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(FolderStateError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replaces the stored list with `folders`.
    pub fn replace(&self, folders: &[OpenFolderEntry]) -> Result<(), FolderStateError> {
        let file = FolderStateFile {
            folders: folders.to_vec(),
        };
        write_json_atomic(&self.path, &file).map_err(|source| FolderStateError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), count = folders.len(), "folder list replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_state_is_empty() {
        let tmp = tempdir().unwrap();
        let store = FolderStateStore::for_workspace(tmp.path());
        assert!(store.load().unwrap().is_empty());
        assert!(store.path().ends_with(".monolithium/folders.json"));
    }

    #[test]
    fn replace_overwrites_whole_list_in_order() {
        let tmp = tempdir().unwrap();
        let store = FolderStateStore::for_workspace(tmp.path());
        store
            .replace(&[
                OpenFolderEntry::new("a", "/repo/a"),
                OpenFolderEntry::new("b", "/repo/b"),
            ])
            .unwrap();
        store
            .replace(&[
                OpenFolderEntry::new("c", "/repo/c"),
                OpenFolderEntry::new("a", "/repo/a"),
            ])
            .unwrap();

        let folders = store.load().unwrap();
        let names: Vec<_> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_state_is_reported() {
        let tmp = tempdir().unwrap();
        let store = FolderStateStore::for_workspace(tmp.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            FolderStateError::Invalid { .. }
        ));
    }
}
