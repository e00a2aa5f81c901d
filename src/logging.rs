//! Error logging with a small rotating archive.
//!
//! Every record goes to stderr. `error!` records are additionally appended to
//! `logs/errors/insomnia_error.log`; the file is then moved into
//! `logs/errors/old/` under a timestamped name and the archive is pruned to
//! the five newest files, so the current log never grows unbounded.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::paths::AppPaths;

/// How many archived log files to keep in `logs/errors/old/`.
pub const MAX_ARCHIVED_LOGS: usize = 5;

const ARCHIVE_PREFIX: &str = "insomnia_error_";

pub fn init(paths: &AppPaths) -> Result<(), SetLoggerError> {
    let logger = InsomniaLogger {
        paths: paths.clone(),
        file: Mutex::new(()),
    };
    logger.prune_archive();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

struct InsomniaLogger {
    paths: AppPaths,
    // Serializes append + rotate across threads.
    file: Mutex<()>,
}

impl Log for InsomniaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        if record.level() == Level::Error {
            let _guard = match self.file.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Err(err) = self.record_error(record) {
                eprintln!("[WARN] insomnia::logging: could not write error log: {err}");
            }
        }
    }

    fn flush(&self) {}
}

impl InsomniaLogger {
    fn record_error(&self, record: &Record) -> io::Result<()> {
        let current = self.paths.error_log_file();
        if let Some(parent) = current.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&current)?;
        writeln!(file, "{} - ERROR - {}", epoch_millis(), record.args())?;
        drop(file);

        let archived = self
            .paths
            .old_logs_dir()
            .join(format!("{ARCHIVE_PREFIX}{}.log", epoch_millis()));
        fs::create_dir_all(self.paths.old_logs_dir())?;
        fs::rename(&current, &archived)?;
        self.prune_archive();
        Ok(())
    }

    /// Keep only the newest `MAX_ARCHIVED_LOGS` archived files.
    fn prune_archive(&self) {
        let Ok(entries) = fs::read_dir(self.paths.old_logs_dir()) else {
            return;
        };
        let mut archived: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX))
            })
            .collect();
        // Timestamped names sort chronologically.
        archived.sort();
        archived.reverse();
        for stale in archived.into_iter().skip(MAX_ARCHIVED_LOGS) {
            let _ = fs::remove_file(stale);
        }
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}
