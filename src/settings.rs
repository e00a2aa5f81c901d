//! Settings document and its JSON persistence.
//!
//! One small document, `TempFileDSettings.json`: the directory map plus three
//! flags. The user copy under `settings/UserSettings/` wins; when it is
//! missing or unreadable we fall back to the default copy under
//! `settings/DefaultSettings/` (shipped by the updater), and failing that to
//! built-in minimal defaults. Load never fails — the application always has a
//! usable document.

use std::collections::BTreeMap;
use std::fs;
use std::io;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::paths::AppPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory path (may contain `%VAR%` references) → enabled flag.
    #[serde(default = "default_directories")]
    pub directories: BTreeMap<String, bool>,
    /// Swallow per-item deletion errors after one best-effort second attempt.
    #[serde(default)]
    pub skip_errors: bool,
    /// Move entries to the recycle bin instead of deleting them outright.
    #[serde(default = "default_move_to_trash")]
    pub move_to_trash: bool,
    /// Empty the recycle bin once a trash-mode run finishes.
    #[serde(default)]
    pub clear_recycle_bin: bool,
}

fn default_directories() -> BTreeMap<String, bool> {
    BTreeMap::from([("%TEMP%".to_owned(), true)])
}

fn default_move_to_trash() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directories: default_directories(),
            skip_errors: false,
            move_to_trash: true,
            clear_recycle_bin: false,
        }
    }
}

impl Settings {
    /// Load the user settings, falling back to defaults on any failure.
    pub fn load(paths: &AppPaths) -> Self {
        let user_file = paths.user_settings_file();
        match fs::read_to_string(&user_file) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("unreadable settings in {}: {err}", user_file.display());
                    Self::fetch_default(paths)
                }
            },
            Err(_) => Self::fetch_default(paths),
        }
    }

    /// Read the shipped default settings (or the built-in minimal defaults)
    /// and persist them as the user settings.
    pub fn fetch_default(paths: &AppPaths) -> Self {
        let defaults = match fs::read_to_string(paths.default_settings_file()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!("unreadable default settings: {err}");
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        if let Err(err) = defaults.save(paths) {
            warn!("could not persist default settings: {err}");
        }
        defaults
    }

    /// Write the document to the user settings file, pretty-printed.
    pub fn save(&self, paths: &AppPaths) -> io::Result<()> {
        let file = paths.user_settings_file();
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&file, content)
    }

    /// True iff every configured directory is enabled.
    pub fn all_directories_enabled(&self) -> bool {
        self.directories.values().all(|enabled| *enabled)
    }
}
