use monolithium_settings::{
    workspace_settings_path, CustomPrefix, LabelRules, SettingsError, SettingsStore,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_layers_yield_defaults() {
    let temp = tempdir().expect("tempdir");
    let store = SettingsStore::new()
        .with_layer(temp.path().join("user.json"))
        .with_layer(workspace_settings_path(temp.path()));

    let settings = store.load().expect("load defaults");
    assert!(settings.include_root);
    assert_eq!(settings.root_prefix, "");
    assert!(settings.custom.is_empty());
}

#[test]
fn workspace_layer_overrides_user_layer_per_key() {
    let temp = tempdir().expect("tempdir");
    let user = temp.path().join("user.json");
    fs::write(
        &user,
        r#"{
            "monolithium.folders.prefix.apps": "A ",
            "monolithium.folders.regex.apps": "^apps/",
            "monolithium.includeRoot": false
        }"#,
    )
    .expect("write user layer");

    let workspace = workspace_settings_path(temp.path());
    fs::create_dir_all(workspace.parent().expect("parent")).expect("state dir");
    fs::write(
        &workspace,
        r#"{
            "monolithium.folders.prefix.apps": "📱 ",
            "monolithium.folders.custom": [{ "regex": "^apps/admin", "prefix": "🛡 " }]
        }"#,
    )
    .expect("write workspace layer");

    let settings = SettingsStore::new()
        .with_layer(&user)
        .with_layer(&workspace)
        .load()
        .expect("load layers");
    assert_eq!(settings.apps_prefix, "📱 ");
    assert_eq!(settings.apps_regex, "^apps/");
    assert!(!settings.include_root);
    assert_eq!(
        settings.custom,
        vec![CustomPrefix::new("^apps/admin", "🛡 ")]
    );
}

#[test]
fn settings_are_reread_on_every_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    let store = SettingsStore::new().with_layer(&path);

    fs::write(&path, r#"{ "monolithium.folders.prefix.root": "🏠 " }"#).expect("write");
    assert_eq!(store.load().expect("first").root_prefix, "🏠 ");

    fs::write(&path, r#"{ "monolithium.folders.prefix.root": "R " }"#).expect("rewrite");
    assert_eq!(store.load().expect("second").root_prefix, "R ");
}

#[test]
fn malformed_layer_reports_its_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("broken.json");
    fs::write(&path, "{ \"monolithium.includeRoot\": ").expect("write");

    let err = SettingsStore::new().with_layer(&path).load().unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));

    fs::write(&path, "[1, 2]").expect("write array");
    let err = SettingsStore::new().with_layer(&path).load().unwrap_err();
    assert!(matches!(err, SettingsError::NotAnObject { .. }));
}

#[test]
fn loaded_settings_compile_into_rules() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "monolithium.folders.prefix.libs": "📚 ",
            "monolithium.folders.regex.libs": "^libs/",
            "monolithium.folders.prefix.unknown": "📦 "
        }"#,
    )
    .expect("write");

    let settings = SettingsStore::new().with_layer(&path).load().expect("load");
    let rules = LabelRules::compile(&settings).expect("compile");
    assert_eq!(rules.prefix_for("libs/core"), "📚 ");
    assert_eq!(rules.prefix_for("apps/web"), "📦 ");
}
