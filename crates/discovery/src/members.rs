use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::manifest::MemberPatterns;
use crate::DiscoveryError;

const SKIPPED_DIRS: [&str; 2] = ["node_modules", ".git"];

/// Expands member globs relative to `root` into package directories.
///
/// A directory only counts as a member when it holds `manifest`. The result is
/// sorted and free of duplicates.
pub(crate) fn expand_members(
    root: &Path,
    patterns: &MemberPatterns,
    manifest: &str,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let excludes = patterns
        .exclude
        .iter()
        .map(|pattern| compile(&escaped_root, pattern))
        .collect::<Result<Vec<_>, _>>()?;

    let mut members = Vec::new();
    for include in &patterns.include {
        let full = join_pattern(&escaped_root, include);
        let entries = glob::glob(&full).map_err(|source| DiscoveryError::Pattern {
            pattern: include.clone(),
            source,
        })?;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(%err, pattern = %include, "skipping unreadable member path");
                    continue;
                }
            };
            if !path.is_dir() || !path.join(manifest).is_file() || is_skipped(root, &path) {
                continue;
            }
            if excludes
                .iter()
                .any(|exclude| exclude.matches_path_with(&path, match_options()))
            {
                tracing::debug!(path = %path.display(), "member excluded by pattern");
                continue;
            }
            members.push(path);
        }
    }
    members.sort();
    members.dedup();
    Ok(members)
}

fn compile(escaped_root: &str, pattern: &str) -> Result<Pattern, DiscoveryError> {
    Pattern::new(&join_pattern(escaped_root, pattern)).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn join_pattern(escaped_root: &str, pattern: &str) -> String {
    let relative = pattern
        .trim()
        .trim_start_matches("./")
        .trim_end_matches('/');
    format!("{}/{}", escaped_root.trim_end_matches('/'), relative)
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

fn is_skipped(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .map(|relative| {
            relative.components().any(|component| match component {
                Component::Normal(name) => SKIPPED_DIRS.iter().any(|skip| name == *skip),
                _ => false,
            })
        })
        .unwrap_or(false)
}
