use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of monorepo manifest a workspace was discovered from.
/// 工作區所依據的 monorepo 定義類型。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkspaceKind {
    Pnpm,
    Lerna,
    Yarn,
    Npm,
    Cargo,
}

impl WorkspaceKind {
    /// Detection order applied to every directory while walking upwards.
    pub const DETECTION_ORDER: [WorkspaceKind; 4] = [
        WorkspaceKind::Pnpm,
        WorkspaceKind::Lerna,
        WorkspaceKind::Npm,
        WorkspaceKind::Cargo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkspaceKind::Pnpm => "pnpm",
            WorkspaceKind::Lerna => "lerna",
            WorkspaceKind::Yarn => "yarn",
            WorkspaceKind::Npm => "npm",
            WorkspaceKind::Cargo => "cargo",
        }
    }

    /// Manifest that marks a member directory as a package.
    pub fn package_manifest(&self) -> &'static str {
        match self {
            WorkspaceKind::Cargo => "Cargo.toml",
            _ => "package.json",
        }
    }
}

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single package registered in a workspace.
/// 工作區內登記的單一套件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub root: PathBuf,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Snapshot of a discovered workspace: its root, type label and packages.
/// 探索結果：工作區根目錄、類型標籤與套件清單。
///
/// Package roots are unique; the first registration of a root wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDescriptor {
    root: PathBuf,
    type_label: String,
    packages: Vec<PackageDescriptor>,
}

impl WorkspaceDescriptor {
    pub fn new(
        root: impl Into<PathBuf>,
        type_label: impl Into<String>,
        packages: impl IntoIterator<Item = PackageDescriptor>,
    ) -> Self {
        let mut seen = HashSet::new();
        let packages = packages
            .into_iter()
            .filter(|package| seen.insert(package.root.clone()))
            .collect();
        Self {
            root: root.into(),
            type_label: type_label.into(),
            packages,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    /// Name of the package whose root is exactly `root`, if one is registered.
    pub fn package_for_root(&self, root: &Path) -> Option<&str> {
        self.packages
            .iter()
            .find(|package| package.root == root)
            .map(|package| package.name.as_str())
    }
}
