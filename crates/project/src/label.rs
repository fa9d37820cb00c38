use std::path::{Component, Path};

use monolithium_settings::LabelRules;

/// Returns the decorative prefix for `package_root` inside `workspace_root`.
/// 依設定規則回傳套件標籤前綴。
///
/// The workspace root always receives the root prefix; every other path is
/// matched, as a POSIX-style path relative to the workspace root, against the
/// ordered rule chain.
pub fn format_label(workspace_root: &Path, package_root: &Path, rules: &LabelRules) -> String {
    if package_root == workspace_root {
        return rules.root_prefix().to_string();
    }
    let relative = relative_path(workspace_root, package_root);
    rules.prefix_for(&relative).to_string()
}

/// Relative path from `base` to `path`, always `/`-separated.
pub fn relative_path(base: &Path, path: &Path) -> String {
    let Some(diff) = pathdiff::diff_paths(path, base) else {
        return path.to_string_lossy().replace('\\', "/");
    };
    diff.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
