//! Background deletion worker.
//!
//! One worker thread walks the enabled directories and removes their
//! immediate children, either into the recycle bin or outright. It reports
//! back over an `mpsc` channel: a percentage after each directory, an error
//! string per failure (unless errors are skipped), and a final `Finished`.
//! There is no cancellation; the worker owns a snapshot of the settings taken
//! when it starts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanerEvent {
    /// Percentage of enabled directories completed, 0..=100.
    Progress(u8),
    /// A per-item or per-directory failure, already formatted for display.
    Error(String),
    /// Always the last event of a run.
    Finished,
}

/// Snapshot of the settings a run operates on.
#[derive(Debug, Clone)]
pub struct CleanJob {
    pub directories: BTreeMap<String, bool>,
    pub move_to_trash: bool,
    pub skip_errors: bool,
}

impl CleanJob {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            directories: settings.directories.clone(),
            move_to_trash: settings.move_to_trash,
            skip_errors: settings.skip_errors,
        }
    }
}

#[derive(Debug, Error)]
pub enum CleanError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Trash(#[from] trash::Error),
}

/// A running (or finished) worker and its event stream.
pub struct CleanerHandle {
    events: Receiver<CleanerEvent>,
    worker: JoinHandle<()>,
}

impl CleanerHandle {
    pub fn try_recv(&self) -> Result<CleanerEvent, TryRecvError> {
        self.events.try_recv()
    }

    /// Block until the next event; `None` once the worker is gone.
    pub fn recv(&self) -> Option<CleanerEvent> {
        self.events.recv().ok()
    }

    pub fn join(self) {
        let _ = self.worker.join();
    }
}

pub fn spawn(job: CleanJob) -> CleanerHandle {
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || run(&job, &tx));
    CleanerHandle { events: rx, worker }
}

fn run(job: &CleanJob, events: &Sender<CleanerEvent>) {
    let enabled: Vec<&str> = job
        .directories
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(directory, _)| directory.as_str())
        .collect();
    let total = enabled.len();
    for (index, directory) in enabled.iter().enumerate() {
        clean_directory(directory, job, events);
        let percent = ((index + 1) * 100 / total) as u8;
        let _ = events.send(CleanerEvent::Progress(percent));
    }
    let _ = events.send(CleanerEvent::Finished);
}

fn clean_directory(directory: &str, job: &CleanJob, events: &Sender<CleanerEvent>) {
    let expanded = expand_env_vars(directory);
    let path = Path::new(&expanded);
    if !path.exists() {
        return;
    }
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            if !job.skip_errors {
                let _ = events.send(CleanerEvent::Error(format!(
                    "Error accessing {expanded}: {err}"
                )));
            }
            return;
        }
    };
    for entry in entries.flatten() {
        let item = entry.path();
        if let Err(err) = remove_entry(&item, job.move_to_trash) {
            if job.skip_errors {
                // One best-effort second attempt, outcome swallowed.
                let _ = remove_entry(&item, job.move_to_trash);
            } else {
                let _ = events.send(CleanerEvent::Error(format!(
                    "Error deleting {}: {err}",
                    item.display()
                )));
            }
        }
    }
}

fn remove_entry(path: &Path, move_to_trash: bool) -> Result<(), CleanError> {
    if move_to_trash {
        trash::delete(path)?;
    } else if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Expand `%VAR%` references. Unknown variables (and stray `%`) are left
/// verbatim; `%USERNAME%` falls back to the OS username when unset.
pub fn expand_env_vars(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match lookup_var(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push('%');
                result.push_str(after);
                return result;
            }
        }
    }
    result.push_str(rest);
    result
}

fn lookup_var(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if let Ok(value) = std::env::var(name) {
        return Some(value);
    }
    if name.eq_ignore_ascii_case("USERNAME") {
        return Some(whoami::username());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::expand_env_vars;

    #[test]
    fn plain_path_passes_through() {
        assert_eq!(expand_env_vars("C:/Temp/sub"), "C:/Temp/sub");
    }

    #[test]
    fn unknown_variable_stays_verbatim() {
        assert_eq!(
            expand_env_vars("%INSOMNIA_SURELY_UNSET_VAR%/x"),
            "%INSOMNIA_SURELY_UNSET_VAR%/x"
        );
    }

    #[test]
    fn set_variable_is_substituted() {
        unsafe { std::env::set_var("INSOMNIA_EXPAND_TEST", "value") };
        assert_eq!(
            expand_env_vars("pre/%INSOMNIA_EXPAND_TEST%/post"),
            "pre/value/post"
        );
    }

    #[test]
    fn trailing_percent_is_kept() {
        assert_eq!(expand_env_vars("50%"), "50%");
    }

    #[test]
    fn username_falls_back_to_os_lookup() {
        let expanded = expand_env_vars("%USERNAME%");
        assert!(!expanded.is_empty());
        assert_ne!(expanded, "%USERNAME%");
    }
}
