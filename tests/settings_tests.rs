//! Settings document persistence.

use std::collections::BTreeMap;
use std::fs;

use insomnia::paths::AppPaths;
use insomnia::settings::Settings;

fn scratch_paths() -> (tempfile::TempDir, AppPaths) {
    let root = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::at_root(root.path().to_path_buf());
    paths.ensure_tree().expect("tree");
    (root, paths)
}

#[test]
fn defaults_match_the_documented_document() {
    let settings = Settings::default();
    assert_eq!(
        settings.directories,
        BTreeMap::from([("%TEMP%".to_owned(), true)])
    );
    assert!(!settings.skip_errors);
    assert!(settings.move_to_trash);
    assert!(!settings.clear_recycle_bin);
}

#[test]
fn save_then_load_round_trips() {
    let (_root, paths) = scratch_paths();
    let mut settings = Settings::default();
    settings.directories.insert("C:/Scratch".to_owned(), false);
    settings.skip_errors = true;
    settings.move_to_trash = false;
    settings.save(&paths).expect("save");

    assert_eq!(Settings::load(&paths), settings);
}

#[test]
fn serialized_document_uses_the_documented_keys() {
    let (_root, paths) = scratch_paths();
    Settings::default().save(&paths).expect("save");

    let content = fs::read_to_string(paths.user_settings_file()).expect("read");
    let document: serde_json::Value = serde_json::from_str(&content).expect("json");
    let object = document.as_object().expect("object");
    assert_eq!(object.len(), 4);
    for key in ["directories", "skip_errors", "move_to_trash", "clear_recycle_bin"] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert!(document["directories"].is_object());
}

#[test]
fn missing_fields_deserialize_to_defaults() {
    let (_root, paths) = scratch_paths();
    fs::write(
        paths.user_settings_file(),
        r#"{"directories": {"C:/Only": false}}"#,
    )
    .expect("write");

    let settings = Settings::load(&paths);
    assert_eq!(settings.directories.get("C:/Only"), Some(&false));
    assert!(!settings.skip_errors);
    assert!(settings.move_to_trash);
    assert!(!settings.clear_recycle_bin);
}

#[test]
fn missing_user_file_falls_back_to_default_file_and_persists_it() {
    let (_root, paths) = scratch_paths();
    fs::write(
        paths.default_settings_file(),
        r#"{"directories": {"%TEMP%": true, "C:/Extra": true}, "skip_errors": true}"#,
    )
    .expect("write defaults");

    let settings = Settings::load(&paths);
    assert!(settings.skip_errors);
    assert_eq!(settings.directories.len(), 2);
    // The fallback is persisted as the user document.
    assert!(paths.user_settings_file().exists());
    assert_eq!(Settings::load(&paths), settings);
}

#[test]
fn corrupt_user_file_falls_back_to_builtin_defaults() {
    let (_root, paths) = scratch_paths();
    fs::write(paths.user_settings_file(), "{not json").expect("write");

    assert_eq!(Settings::load(&paths), Settings::default());
}
