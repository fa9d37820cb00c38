//! Settings for Monolithium: the `monolithium.*` keys and the prefix rules
//! compiled from them.
//! Monolithium 設定：`monolithium.*` 鍵值與由其編譯出的前綴規則。

pub mod rules;
pub mod settings;

pub use rules::{LabelRules, PrefixRule};
pub use settings::{
    workspace_settings_path, CustomPrefix, PackageCategory, Settings, SettingsError,
    SettingsStore, SETTINGS_FILE, WORKSPACE_STATE_DIR,
};
