//! Readers for the manifests that declare a workspace and its packages.
//! 讀取宣告工作區與套件的各類定義檔。

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::{DiscoveryError, WorkspaceKind};

const PACKAGE_JSON: &str = "package.json";
const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";
const LERNA_JSON: &str = "lerna.json";
const CARGO_TOML: &str = "Cargo.toml";
const YARN_LOCK: &str = "yarn.lock";
const LERNA_DEFAULT_PACKAGES: &str = "packages/*";

/// Member globs declared by a root manifest, split into includes and `!` excludes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MemberPatterns {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl MemberPatterns {
    fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut patterns = Self::default();
        for entry in entries {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.strip_prefix('!') {
                Some(negated) => patterns.exclude.push(negated.to_string()),
                None => patterns.include.push(trimmed.to_string()),
            }
        }
        patterns
    }
}

/// Root manifest found in a candidate directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootManifest {
    pub kind: WorkspaceKind,
    pub patterns: MemberPatterns,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NodePackage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    workspaces: Option<NodeWorkspaces>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeWorkspaces {
    List(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LernaConfig {
    #[serde(default)]
    packages: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    #[serde(default)]
    package: Option<CargoPackage>,
    #[serde(default)]
    workspace: Option<CargoWorkspace>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CargoWorkspace {
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

/// Reads the root manifest of `kind` in `dir`, returning `None` when the
/// directory does not declare a workspace of that kind.
pub(crate) fn read_root_manifest(
    dir: &Path,
    kind: WorkspaceKind,
) -> Result<Option<RootManifest>, DiscoveryError> {
    match kind {
        WorkspaceKind::Pnpm => {
            let Some(contents) = read_optional(&dir.join(PNPM_WORKSPACE))? else {
                return Ok(None);
            };
            let parsed: PnpmWorkspace =
                serde_yaml::from_str(&contents).map_err(|source| DiscoveryError::ParseYaml {
                    path: dir.join(PNPM_WORKSPACE),
                    source,
                })?;
            Ok(Some(RootManifest {
                kind,
                patterns: MemberPatterns::from_entries(parsed.packages),
                name: read_node_package(dir)?.and_then(|package| package.name),
            }))
        }
        WorkspaceKind::Lerna => {
            let Some(contents) = read_optional(&dir.join(LERNA_JSON))? else {
                return Ok(None);
            };
            let parsed: LernaConfig =
                serde_json::from_str(&contents).map_err(|source| DiscoveryError::ParseJson {
                    path: dir.join(LERNA_JSON),
                    source,
                })?;
            let entries = parsed
                .packages
                .unwrap_or_else(|| vec![LERNA_DEFAULT_PACKAGES.to_string()]);
            Ok(Some(RootManifest {
                kind,
                patterns: MemberPatterns::from_entries(entries),
                name: read_node_package(dir)?.and_then(|package| package.name),
            }))
        }
        WorkspaceKind::Yarn | WorkspaceKind::Npm => {
            let Some(package) = read_node_package(dir)? else {
                return Ok(None);
            };
            let entries = match package.workspaces {
                Some(NodeWorkspaces::List(entries)) => entries,
                Some(NodeWorkspaces::Object { packages }) => packages,
                None => return Ok(None),
            };
            let kind = if dir.join(YARN_LOCK).is_file() {
                WorkspaceKind::Yarn
            } else {
                WorkspaceKind::Npm
            };
            Ok(Some(RootManifest {
                kind,
                patterns: MemberPatterns::from_entries(entries),
                name: package.name,
            }))
        }
        WorkspaceKind::Cargo => {
            let Some(manifest) = read_cargo_manifest(dir)? else {
                return Ok(None);
            };
            let Some(workspace) = manifest.workspace else {
                return Ok(None);
            };
            let mut patterns = MemberPatterns::from_entries(workspace.members);
            patterns.exclude.extend(workspace.exclude);
            Ok(Some(RootManifest {
                kind,
                patterns,
                name: manifest.package.map(|package| package.name),
            }))
        }
    }
}

/// Reads the package name declared by the member manifest in `dir`.
pub(crate) fn read_package_name(
    dir: &Path,
    kind: WorkspaceKind,
) -> Result<Option<String>, DiscoveryError> {
    match kind {
        WorkspaceKind::Cargo => {
            Ok(read_cargo_manifest(dir)?.and_then(|manifest| manifest.package.map(|p| p.name)))
        }
        _ => Ok(read_node_package(dir)?.and_then(|package| package.name)),
    }
}

fn read_node_package(dir: &Path) -> Result<Option<NodePackage>, DiscoveryError> {
    let path = dir.join(PACKAGE_JSON);
    let Some(contents) = read_optional(&path)? else {
        return Ok(None);
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| DiscoveryError::ParseJson { path, source })
}

fn read_cargo_manifest(dir: &Path) -> Result<Option<CargoManifest>, DiscoveryError> {
    let path = dir.join(CARGO_TOML);
    let Some(contents) = read_optional(&path)? else {
        return Ok(None);
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| DiscoveryError::ParseToml { path, source })
}

fn read_optional(path: &Path) -> Result<Option<String>, DiscoveryError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DiscoveryError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn negated_entries_become_excludes() {
        let patterns = MemberPatterns::from_entries(
            ["packages/*", " ", "!packages/internal", "apps/web"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(patterns.include, vec!["packages/*", "apps/web"]);
        assert_eq!(patterns.exclude, vec!["packages/internal"]);
    }

    #[test]
    fn package_json_without_workspaces_is_not_a_root() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PACKAGE_JSON), r#"{ "name": "leaf" }"#).unwrap();
        let manifest = read_root_manifest(dir.path(), WorkspaceKind::Npm).unwrap();
        assert!(manifest.is_none());
    }

    #[test]
    fn yarn_lock_switches_kind_to_yarn() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PACKAGE_JSON),
            r#"{ "name": "mono", "workspaces": { "packages": ["libs/*"] } }"#,
        )
        .unwrap();
        fs::write(dir.path().join(YARN_LOCK), "").unwrap();
        let manifest = read_root_manifest(dir.path(), WorkspaceKind::Npm)
            .unwrap()
            .unwrap();
        assert_eq!(manifest.kind, WorkspaceKind::Yarn);
        assert_eq!(manifest.name.as_deref(), Some("mono"));
        assert_eq!(manifest.patterns.include, vec!["libs/*"]);
    }

    #[test]
    fn lerna_defaults_to_packages_glob() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LERNA_JSON), r#"{ "version": "1.0.0" }"#).unwrap();
        let manifest = read_root_manifest(dir.path(), WorkspaceKind::Lerna)
            .unwrap()
            .unwrap();
        assert_eq!(manifest.patterns.include, vec![LERNA_DEFAULT_PACKAGES]);
        assert_eq!(manifest.name, None);
    }

    #[test]
    fn cargo_workspace_merges_exclude_list() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CARGO_TOML),
            "[workspace]\nmembers = [\"crates/*\"]\nexclude = [\"crates/scratch\"]\n",
        )
        .unwrap();
        let manifest = read_root_manifest(dir.path(), WorkspaceKind::Cargo)
            .unwrap()
            .unwrap();
        assert_eq!(manifest.patterns.include, vec!["crates/*"]);
        assert_eq!(manifest.patterns.exclude, vec!["crates/scratch"]);
    }

    #[test]
    fn malformed_pnpm_manifest_reports_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PNPM_WORKSPACE), "packages: [unclosed").unwrap();
        let err = read_root_manifest(dir.path(), WorkspaceKind::Pnpm).unwrap_err();
        assert!(matches!(err, DiscoveryError::ParseYaml { .. }));
        assert!(err.to_string().contains(PNPM_WORKSPACE));
    }
}
