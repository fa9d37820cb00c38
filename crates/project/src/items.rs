use std::path::PathBuf;

use monolithium_discovery::WorkspaceDescriptor;
use monolithium_settings::LabelRules;
use serde::Serialize;

use crate::label::{format_label, relative_path};
use crate::reconcile::OpenFolderEntry;

const ROOT_FALLBACK_NAME: &str = "root";

/// One entry of the package picker.
/// 套件選單中的一個項目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderItem {
    pub label: String,
    pub description: String,
    pub root: PathBuf,
    pub is_workspace_root: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub picked: bool,
}

impl FolderItem {
    /// Item standing for an open folder that discovery does not know about.
    pub fn from_open_folder(folder: &OpenFolderEntry) -> Self {
        Self {
            label: folder.name.clone(),
            description: String::new(),
            root: folder.uri.clone(),
            is_workspace_root: false,
            picked: true,
        }
    }
}

/// Projects a discovered workspace onto picker items.
/// 將探索到的工作區轉換為選單項目。
///
/// The workspace root (when `include_root`) comes first; the remaining
/// packages follow in ascending order of their absolute root path.
pub fn build_items(
    workspace: &WorkspaceDescriptor,
    include_root: bool,
    rules: &LabelRules,
) -> Vec<FolderItem> {
    let root = workspace.root();
    let mut items = Vec::with_capacity(workspace.packages().len() + 1);
    if include_root {
        let name = workspace
            .package_for_root(root)
            .unwrap_or(ROOT_FALLBACK_NAME);
        items.push(FolderItem {
            label: format!("{}{}", format_label(root, root, rules), name),
            description: format!("{} Workspace Root", capitalize(workspace.type_label())),
            root: root.to_path_buf(),
            is_workspace_root: true,
            picked: false,
        });
    }

    let mut packages: Vec<FolderItem> = workspace
        .packages()
        .iter()
        .filter(|package| package.root != root)
        .map(|package| FolderItem {
            label: format!("{}{}", format_label(root, &package.root, rules), package.name),
            description: format!("at {}", relative_path(root, &package.root)),
            root: package.root.clone(),
            is_workspace_root: false,
            picked: false,
        })
        .collect();
    packages.sort_by(|a, b| a.root.as_os_str().cmp(b.root.as_os_str()));
    items.extend(packages);
    items
}

/// Marks items already open in the host and appends items for open folders
/// that discovery did not report, so the multi-select picker shows the
/// current folder set pre-checked.
pub fn pre_populate(mut items: Vec<FolderItem>, open_folders: &[OpenFolderEntry]) -> Vec<FolderItem> {
    let mut extra = Vec::new();
    for folder in open_folders {
        match items.iter_mut().find(|item| item.root == folder.uri) {
            Some(item) => item.picked = true,
            None => {
                if !extra.iter().any(|item: &FolderItem| item.root == folder.uri) {
                    extra.push(FolderItem::from_open_folder(folder));
                }
            }
        }
    }
    items.extend(extra);
    items
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monolithium_discovery::PackageDescriptor;
    use monolithium_settings::Settings;

    fn rules() -> LabelRules {
        LabelRules::compile(&Settings {
            apps_regex: "^apps/".into(),
            apps_prefix: "📱 ".into(),
            libs_regex: "^libs/".into(),
            libs_prefix: "📚 ".into(),
            ..Settings::default()
        })
        .unwrap()
    }

    fn sample() -> WorkspaceDescriptor {
        WorkspaceDescriptor::new(
            "/repo",
            "yarn",
            [
                PackageDescriptor::new("core", "/repo/libs/core"),
                PackageDescriptor::new("cli", "/repo/apps/cli"),
            ],
        )
    }

    #[test]
    fn root_first_then_packages_by_path() {
        let items = build_items(&sample(), true, &rules());
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["root", "📱 cli", "📚 core"]);

        assert!(items[0].is_workspace_root);
        assert_eq!(items[0].root, PathBuf::from("/repo"));
        assert_eq!(items[0].description, "Yarn Workspace Root");
        assert_eq!(items[1].description, "at apps/cli");
        assert_eq!(items[2].root, PathBuf::from("/repo/libs/core"));
    }

    #[test]
    fn root_label_uses_registered_root_package() {
        let workspace = WorkspaceDescriptor::new(
            "/repo",
            "npm",
            [
                PackageDescriptor::new("zeta", "/repo/packages/zeta"),
                PackageDescriptor::new("monorepo", "/repo"),
            ],
        );
        let items = build_items(&workspace, true, &rules());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "monorepo");
        assert!(!items[1].is_workspace_root);
    }

    #[test]
    fn excluding_root_drops_root_package_too() {
        let workspace = WorkspaceDescriptor::new(
            "/repo",
            "npm",
            [
                PackageDescriptor::new("monorepo", "/repo"),
                PackageDescriptor::new("web", "/repo/apps/web"),
            ],
        );
        let items = build_items(&workspace, false, &rules());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "📱 web");
    }

    #[test]
    fn packages_sort_by_path_string_not_name() {
        let workspace = WorkspaceDescriptor::new(
            "/repo",
            "pnpm",
            [
                PackageDescriptor::new("a", "/repo/pkg/z"),
                PackageDescriptor::new("b", "/repo/pkg/a/b"),
                PackageDescriptor::new("c", "/repo/pkg/a-b"),
            ],
        );
        let items = build_items(&workspace, false, &rules());
        let roots: Vec<_> = items.iter().map(|item| item.root.clone()).collect();
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/repo/pkg/a-b"),
                PathBuf::from("/repo/pkg/a/b"),
                PathBuf::from("/repo/pkg/z"),
            ]
        );
    }

    #[test]
    fn building_twice_is_identical() {
        let workspace = sample();
        let rules = rules();
        assert_eq!(
            build_items(&workspace, true, &rules),
            build_items(&workspace, true, &rules)
        );
    }

    #[test]
    fn empty_type_label_still_describes_root() {
        let workspace = WorkspaceDescriptor::new("/repo", "", Vec::new());
        let items = build_items(&workspace, true, &rules());
        assert_eq!(items[0].description, " Workspace Root");
    }

    #[test]
    fn pre_populate_marks_open_and_appends_unknown() {
        let items = build_items(&sample(), true, &rules());
        let open = vec![
            OpenFolderEntry::new("📚 core", "/repo/libs/core"),
            OpenFolderEntry::new("scratch", "/tmp/scratch"),
            OpenFolderEntry::new("scratch again", "/tmp/scratch"),
        ];
        let items = pre_populate(items, &open);

        assert_eq!(items.len(), 4);
        assert!(!items[0].picked);
        assert!(!items[1].picked);
        assert!(items[2].picked);
        let extra = &items[3];
        assert_eq!(extra.label, "scratch");
        assert_eq!(extra.description, "");
        assert!(extra.picked);
        assert!(!extra.is_workspace_root);
    }
}
