use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::items::FolderItem;

/// A folder in the host's multi-root folder list.
/// 多根工作區中的一個資料夾。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFolderEntry {
    pub name: String,
    pub uri: PathBuf,
}

impl OpenFolderEntry {
    pub fn new(name: impl Into<String>, uri: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

impl From<&FolderItem> for OpenFolderEntry {
    fn from(item: &FolderItem) -> Self {
        Self {
            name: item.label.clone(),
            uri: item.root.clone(),
        }
    }
}

/// Computes the complete folder list to hand to the host.
/// 計算要交給宿主的完整資料夾清單。
///
/// Without `clean_slate`, open folders that are not being re-selected are kept
/// ahead of the selection, in their current order. The host replaces its whole
/// folder list with the result, so order matters. An empty selection yields
/// `None`: nothing is applied and existing folders stay untouched.
pub fn reconcile(
    selected: &[FolderItem],
    open_folders: &[OpenFolderEntry],
    clean_slate: bool,
) -> Option<Vec<OpenFolderEntry>> {
    if selected.is_empty() {
        return None;
    }
    let selected_roots: HashSet<&Path> = selected.iter().map(|item| item.root.as_path()).collect();

    let mut folders = Vec::with_capacity(open_folders.len() + selected.len());
    if !clean_slate {
        folders.extend(
            open_folders
                .iter()
                .filter(|folder| !selected_roots.contains(folder.uri.as_path()))
                .cloned(),
        );
    }
    folders.extend(selected.iter().map(OpenFolderEntry::from));
    Some(folders)
}
