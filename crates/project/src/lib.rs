//! Picker items, folder reconciliation and open targets for Monolithium.
//! 管理 Monolithium 的選單項目、資料夾調和與開啟目標。

mod util;

pub mod folders;
pub mod items;
pub mod label;
pub mod locator;
pub mod picker;
pub mod reconcile;

pub use folders::{FolderStateError, FolderStateStore, FOLDERS_FILE};
pub use items::{build_items, pre_populate, FolderItem};
pub use label::{format_label, relative_path};
pub use locator::{
    locate_workspace_file, resolve_open_target, LocateError, OpenTarget, WORKSPACE_FILE_DIR,
    WORKSPACE_FILE_GLOB,
};
pub use picker::{filter_items, matches_query};
pub use reconcile::{reconcile, OpenFolderEntry};
