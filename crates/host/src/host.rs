use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use monolithium_project::{FolderItem, OpenFolderEntry, OpenTarget};
use monolithium_settings::{Settings, SettingsError};
use thiserror::Error;

/// Where an opened package should land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageAction {
    CurrentWindow,
    NewWindow,
}

impl PackageAction {
    pub fn new_window(&self) -> bool {
        matches!(self, PackageAction::NewWindow)
    }
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageAction::CurrentWindow => f.write_str("current window"),
            PackageAction::NewWindow => f.write_str("new window"),
        }
    }
}

/// Failure reported by a host implementation.
#[derive(Debug, Error)]
#[error("{message}{}", .source.as_ref().map(|source| format!(": {source}")).unwrap_or_default())]
pub struct HostError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// The editor the commands run inside.
/// 指令所在的編輯器宿主。
///
/// Everything the commands know about editor state comes through this trait:
/// the open folders, the configuration, the pickers and the window actions.
pub trait Host {
    /// Folders currently open in the multi-root workspace, in display order.
    fn workspace_folders(&self) -> Result<Vec<OpenFolderEntry>, HostError>;

    /// Directory the host was started from, used when no folder is open.
    fn launch_dir(&self) -> Option<PathBuf>;

    /// Reads the configuration afresh.
    fn settings(&self) -> Result<Settings, SettingsError>;

    /// Single-choice picker. `None` means the picker was dismissed.
    fn pick_one(&mut self, items: &[FolderItem]) -> Result<Option<FolderItem>, HostError>;

    /// Multi-choice picker honouring each item's `picked` flag as the initial
    /// state. `None` means the picker was dismissed.
    fn pick_many(&mut self, items: &[FolderItem]) -> Result<Option<Vec<FolderItem>>, HostError>;

    fn open_folder(&mut self, target: &OpenTarget, action: PackageAction) -> Result<(), HostError>;

    /// Replaces the whole multi-root folder list with `folders`.
    fn update_workspace_folders(&mut self, folders: &[OpenFolderEntry]) -> Result<(), HostError>;
}
