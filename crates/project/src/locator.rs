//! Lookup of editor workspace files shipped inside a package.
//! 尋找套件內附的編輯器工作區定義檔。

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use glob::{GlobError, Pattern, PatternError};
use thiserror::Error;

/// Conventional directory holding workspace definition files.
pub const WORKSPACE_FILE_DIR: &str = ".vscode";
/// Glob matched inside [`WORKSPACE_FILE_DIR`].
pub const WORKSPACE_FILE_GLOB: &str = "*.code-workspace";

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid workspace file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },
    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to scan for workspace files: {0}")]
    Scan(#[from] GlobError),
}

/// What the host should open for a selected package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    Folder(PathBuf),
    WorkspaceFile(PathBuf),
}

impl OpenTarget {
    pub fn path(&self) -> &Path {
        match self {
            OpenTarget::Folder(path) | OpenTarget::WorkspaceFile(path) => path,
        }
    }
}

/// Finds `<package_root>/.vscode/*.code-workspace`.
///
/// Matches are taken in alphabetical order, so the first file by name wins.
/// A missing directory or an empty match set is `Ok(None)`. Any other
/// filesystem error, including a scan error, is returned immediately without
/// looking at matches found so far.
pub fn locate_workspace_file(package_root: &Path) -> Result<Option<PathBuf>, LocateError> {
    let dir = package_root.join(WORKSPACE_FILE_DIR);
    match fs::metadata(&dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(None),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(LocateError::Io { path: dir, source }),
    }
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        WORKSPACE_FILE_GLOB
    );
    let entries = glob::glob(&pattern).map_err(|source| LocateError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;
    let mut matches = entries.collect::<Result<Vec<_>, GlobError>>()?;
    matches.sort();
    let found = matches.into_iter().next();
    if let Some(path) = &found {
        tracing::debug!(path = %path.display(), "workspace file found");
    }
    Ok(found)
}

/// Resolves the open target for `package_root`: its workspace file when one
/// exists, else the folder itself.
pub fn resolve_open_target(package_root: &Path) -> Result<OpenTarget, LocateError> {
    Ok(match locate_workspace_file(package_root)? {
        Some(file) => OpenTarget::WorkspaceFile(file),
        None => OpenTarget::Folder(package_root.to_path_buf()),
    })
}
