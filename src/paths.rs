//! Application directory tree.
//!
//! Everything Insomnia writes lives under one root: `C:/Insomnia.cc` on
//! Windows, `~/.insomnia` elsewhere. `INSOMNIA_ROOT` overrides the root,
//! which is how the tests point the whole crate at a scratch directory.

use std::io;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "TempFileDSettings.json";
pub const ERROR_LOG_FILE_NAME: &str = "insomnia_error.log";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Self {
        if let Ok(root) = std::env::var("INSOMNIA_ROOT") {
            return Self::at_root(PathBuf::from(root));
        }
        if cfg!(windows) {
            Self::at_root(PathBuf::from("C:/Insomnia.cc"))
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            Self::at_root(Path::new(&home).join(".insomnia"))
        }
    }

    pub fn at_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn default_settings_dir(&self) -> PathBuf {
        self.root.join("settings").join("DefaultSettings")
    }

    pub fn user_settings_dir(&self) -> PathBuf {
        self.root.join("settings").join("UserSettings")
    }

    pub fn user_settings_file(&self) -> PathBuf {
        self.user_settings_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn default_settings_file(&self) -> PathBuf {
        self.default_settings_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn deleter_scripts_dir(&self) -> PathBuf {
        self.scripts_dir().join("TempFilesDeleter")
    }

    pub fn error_logs_dir(&self) -> PathBuf {
        self.root.join("logs").join("errors")
    }

    pub fn old_logs_dir(&self) -> PathBuf {
        self.error_logs_dir().join("old")
    }

    pub fn error_log_file(&self) -> PathBuf {
        self.error_logs_dir().join(ERROR_LOG_FILE_NAME)
    }

    pub fn icon_file(&self) -> PathBuf {
        self.assets_dir().join("icon.png")
    }

    /// Create the whole tree. Called once at startup.
    pub fn ensure_tree(&self) -> io::Result<()> {
        for dir in [
            self.assets_dir(),
            self.default_settings_dir(),
            self.user_settings_dir(),
            self.deleter_scripts_dir(),
            self.old_logs_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
