//! Workspace and package discovery for monorepo-style repositories.
//! 探索 monorepo 工作區與其套件。
//!
//! Starting from a working directory, the discoverer walks towards the
//! filesystem root and stops at the first directory that declares a workspace
//! (`pnpm-workspace.yaml`, `lerna.json`, `package.json#workspaces` or a Cargo
//! `[workspace]`). Member globs are expanded and every member manifest is read
//! for its package name.

mod descriptor;
mod manifest;
mod members;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use descriptor::{PackageDescriptor, WorkspaceDescriptor, WorkspaceKind};

/// Errors raised while reading workspace manifests.
/// 讀取工作區定義檔時的錯誤。
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid member pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Source of workspace descriptors.
/// 工作區描述的提供者。
pub trait PackageDiscoverer {
    /// Returns the workspace enclosing `cwd`, or `None` when there is none.
    fn discover(&self, cwd: &Path) -> Result<Option<WorkspaceDescriptor>, DiscoveryError>;
}

/// Filesystem-backed discoverer understanding pnpm, lerna, yarn, npm and cargo workspaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDiscoverer;

impl PackageDiscoverer for FsDiscoverer {
    fn discover(&self, cwd: &Path) -> Result<Option<WorkspaceDescriptor>, DiscoveryError> {
        let start = fs::canonicalize(cwd).map_err(|source| DiscoveryError::Read {
            path: cwd.to_path_buf(),
            source,
        })?;

        for dir in start.ancestors() {
            for kind in WorkspaceKind::DETECTION_ORDER {
                match manifest::read_root_manifest(dir, kind) {
                    Ok(Some(root)) => {
                        tracing::debug!(root = %dir.display(), kind = %root.kind, "workspace found");
                        return collect(dir, root).map(Some);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(%err, dir = %dir.display(), %kind, "skipping unreadable workspace manifest");
                    }
                }
            }
        }
        tracing::debug!(cwd = %start.display(), "no workspace manifest found");
        Ok(None)
    }
}

/// Convenience wrapper around [`FsDiscoverer`].
pub fn discover(cwd: impl AsRef<Path>) -> Result<Option<WorkspaceDescriptor>, DiscoveryError> {
    FsDiscoverer.discover(cwd.as_ref())
}

fn collect(
    root: &Path,
    manifest: manifest::RootManifest,
) -> Result<WorkspaceDescriptor, DiscoveryError> {
    let kind = manifest.kind;
    let mut packages = Vec::new();
    if let Some(name) = manifest.name {
        packages.push(PackageDescriptor::new(name, root));
    }

    for member in members::expand_members(root, &manifest.patterns, kind.package_manifest())? {
        match manifest::read_package_name(&member, kind) {
            Ok(name) => {
                let name = name.unwrap_or_else(|| directory_name(&member));
                packages.push(PackageDescriptor::new(name, member));
            }
            Err(err) => {
                tracing::warn!(%err, member = %member.display(), "skipping unreadable package manifest");
            }
        }
    }

    Ok(WorkspaceDescriptor::new(root, kind.label(), packages))
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
