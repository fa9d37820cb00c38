use std::path::PathBuf;

use monolithium_discovery::{PackageDiscoverer, WorkspaceDescriptor};
use monolithium_project::{
    build_items, pre_populate, reconcile, resolve_open_target, FolderItem, LocateError,
    OpenFolderEntry, OpenTarget,
};
use monolithium_settings::{LabelRules, SettingsError};
use thiserror::Error;

use crate::host::{Host, HostError, PackageAction};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Why a command stopped without touching the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// No working directory, or no workspace around it.
    NoWorkspace,
    /// The workspace produced no pickable items.
    NoItems,
    /// The picker was dismissed or nothing was chosen.
    Cancelled,
}

/// Result of a command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Opened {
        target: OpenTarget,
        action: PackageAction,
    },
    FoldersReplaced(Vec<OpenFolderEntry>),
    Aborted(AbortReason),
}

/// The editor commands: open a package, or pick packages for the folder list.
/// 編輯器指令：開啟套件，或挑選套件加入資料夾清單。
#[derive(Debug, Clone, Default)]
pub struct Commands<D> {
    discoverer: D,
}

impl<D: PackageDiscoverer> Commands<D> {
    pub fn new(discoverer: D) -> Self {
        Self { discoverer }
    }

    /// Picker items for the workspace around the host's working directory.
    ///
    /// `Ok(None)` means there is nothing to show; callers abort silently.
    pub fn package_folders<H: Host>(
        &self,
        host: &H,
    ) -> Result<Option<Vec<FolderItem>>, CommandError> {
        let Some(workspace) = self.workspace(host)? else {
            return Ok(None);
        };
        let settings = host.settings()?;
        let rules = LabelRules::compile(&settings)?;
        Ok(Some(build_items(&workspace, settings.include_root, &rules)))
    }

    /// Opens one package, preferring its `.vscode/*.code-workspace` file.
    pub fn open_package<H: Host>(
        &self,
        host: &mut H,
        action: PackageAction,
    ) -> Result<CommandOutcome, CommandError> {
        let items = match self.package_folders(host)? {
            Some(items) if !items.is_empty() => items,
            Some(_) => return Ok(aborted(AbortReason::NoItems)),
            None => return Ok(aborted(AbortReason::NoWorkspace)),
        };
        let Some(item) = host.pick_one(&items)? else {
            return Ok(aborted(AbortReason::Cancelled));
        };

        let target = resolve_open_target(&item.root)?;
        tracing::info!(path = %target.path().display(), %action, "opening package");
        host.open_folder(&target, action)?;
        Ok(CommandOutcome::Opened { target, action })
    }

    /// Lets the user pick packages for the multi-root folder list.
    ///
    /// The picker starts with the open folders checked. With `clean_slate`
    /// the selection becomes the whole list; otherwise open folders that were
    /// not picked are kept ahead of the selection.
    pub fn select_packages<H: Host>(
        &self,
        host: &mut H,
        clean_slate: bool,
    ) -> Result<CommandOutcome, CommandError> {
        let items = match self.package_folders(host)? {
            Some(items) if !items.is_empty() => items,
            Some(_) => return Ok(aborted(AbortReason::NoItems)),
            None => return Ok(aborted(AbortReason::NoWorkspace)),
        };
        let open_folders = host.workspace_folders()?;
        let items = pre_populate(items, &open_folders);

        let Some(selected) = host.pick_many(&items)? else {
            return Ok(aborted(AbortReason::Cancelled));
        };
        let Some(folders) = reconcile(&selected, &open_folders, clean_slate) else {
            return Ok(aborted(AbortReason::Cancelled));
        };

        tracing::info!(count = folders.len(), clean_slate, "replacing workspace folders");
        host.update_workspace_folders(&folders)?;
        Ok(CommandOutcome::FoldersReplaced(folders))
    }

    fn workspace<H: Host>(&self, host: &H) -> Result<Option<WorkspaceDescriptor>, CommandError> {
        let Some(cwd) = working_dir(host)? else {
            tracing::debug!("no working directory available");
            return Ok(None);
        };
        match self.discoverer.discover(&cwd) {
            Ok(Some(workspace)) => Ok(Some(workspace)),
            Ok(None) => {
                tracing::debug!(cwd = %cwd.display(), "no workspace found");
                Ok(None)
            }
            Err(err) => {
                tracing::debug!(%err, cwd = %cwd.display(), "workspace discovery failed");
                Ok(None)
            }
        }
    }
}

/// First open folder, else the host's launch directory.
fn working_dir<H: Host>(host: &H) -> Result<Option<PathBuf>, HostError> {
    let folders = host.workspace_folders()?;
    Ok(folders
        .into_iter()
        .next()
        .map(|folder| folder.uri)
        .or_else(|| host.launch_dir()))
}

fn aborted(reason: AbortReason) -> CommandOutcome {
    tracing::debug!(?reason, "command aborted");
    CommandOutcome::Aborted(reason)
}
