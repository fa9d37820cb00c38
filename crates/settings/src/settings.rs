use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory, relative to a workspace root, holding per-workspace state.
pub const WORKSPACE_STATE_DIR: &str = ".monolithium";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings {path} must contain a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("invalid settings value: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid regular expression in `{key}`: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// A user-defined `{regex, prefix}` pair evaluated before the built-in categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomPrefix {
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub prefix: String,
}

impl CustomPrefix {
    pub fn new(regex: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            prefix: prefix.into(),
        }
    }
}

/// Built-in package categories, in the order they are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageCategory {
    Apps,
    Libs,
    Tools,
}

impl PackageCategory {
    pub const ORDER: [PackageCategory; 3] = [
        PackageCategory::Apps,
        PackageCategory::Libs,
        PackageCategory::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageCategory::Apps => "apps",
            PackageCategory::Libs => "libs",
            PackageCategory::Tools => "tools",
        }
    }
}

/// Typed view of the `monolithium.*` settings keys.
///
/// Every string defaults to empty, so a missing key never fails a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "monolithium.folders.prefix.root", default)]
    pub root_prefix: String,
    #[serde(rename = "monolithium.folders.prefix.apps", default)]
    pub apps_prefix: String,
    #[serde(rename = "monolithium.folders.prefix.libs", default)]
    pub libs_prefix: String,
    #[serde(rename = "monolithium.folders.prefix.tools", default)]
    pub tools_prefix: String,
    #[serde(rename = "monolithium.folders.prefix.unknown", default)]
    pub unknown_prefix: String,
    #[serde(rename = "monolithium.folders.regex.apps", default)]
    pub apps_regex: String,
    #[serde(rename = "monolithium.folders.regex.libs", default)]
    pub libs_regex: String,
    #[serde(rename = "monolithium.folders.regex.tools", default)]
    pub tools_regex: String,
    #[serde(rename = "monolithium.folders.custom", default)]
    pub custom: Vec<CustomPrefix>,
    #[serde(rename = "monolithium.includeRoot", default = "default_true")]
    pub include_root: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_prefix: String::new(),
            apps_prefix: String::new(),
            libs_prefix: String::new(),
            tools_prefix: String::new(),
            unknown_prefix: String::new(),
            apps_regex: String::new(),
            libs_regex: String::new(),
            tools_regex: String::new(),
            custom: Vec::new(),
            include_root: true,
        }
    }
}

impl Settings {
    pub fn category_prefix(&self, category: PackageCategory) -> &str {
        match category {
            PackageCategory::Apps => &self.apps_prefix,
            PackageCategory::Libs => &self.libs_prefix,
            PackageCategory::Tools => &self.tools_prefix,
        }
    }

    pub fn category_regex(&self, category: PackageCategory) -> &str {
        match category {
            PackageCategory::Apps => &self.apps_regex,
            PackageCategory::Libs => &self.libs_regex,
            PackageCategory::Tools => &self.tools_regex,
        }
    }

    /// Decodes settings from a flat key/value map. `null` values count as unset.
    pub fn from_values(mut values: Map<String, Value>) -> Result<Self, SettingsError> {
        values.retain(|_, value| !value.is_null());
        serde_json::from_value(Value::Object(values))
            .map_err(|source| SettingsError::Decode { source })
    }
}

/// Path of the workspace-level settings file under `workspace_root`.
pub fn workspace_settings_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_STATE_DIR).join(SETTINGS_FILE)
}

/// Ordered list of settings files; later layers override earlier ones key by key.
///
/// Files are read on every [`SettingsStore::load`] call and never cached.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    layers: Vec<PathBuf>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(path.into());
        self
    }

    pub fn load(&self) -> Result<Settings, SettingsError> {
        let mut merged = Map::new();
        for path in &self.layers {
            if let Some(values) = read_layer(path)? {
                tracing::debug!(path = %path.display(), keys = values.len(), "settings layer loaded");
                merged.extend(values);
            }
        }
        Settings::from_values(merged)
    }
}

fn read_layer(path: &Path) -> Result<Option<Map<String, Value>>, SettingsError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(values) => Ok(Some(values)),
        _ => Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
