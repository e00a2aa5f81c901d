//! Error-log rotation. One test only: the global logger can be installed
//! once per process.

use std::fs;
use std::time::Duration;

use insomnia::logging::{self, MAX_ARCHIVED_LOGS};
use insomnia::paths::AppPaths;

#[test]
fn error_records_rotate_and_the_archive_is_pruned() {
    let root = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::at_root(root.path().to_path_buf());
    paths.ensure_tree().expect("tree");
    logging::init(&paths).expect("logger");

    for i in 0..8 {
        log::error!("induced failure {i}");
        // Archive names are timestamped; keep them distinct.
        std::thread::sleep(Duration::from_millis(2));
    }

    let archived: Vec<_> = fs::read_dir(paths.old_logs_dir())
        .expect("archive dir")
        .filter_map(|entry| entry.ok())
        .collect();
    assert!(!archived.is_empty());
    assert!(
        archived.len() <= MAX_ARCHIVED_LOGS,
        "archive kept {} files",
        archived.len()
    );
    // The current log is always rotated away after an error.
    assert!(!paths.error_log_file().exists());

    // Non-error records never touch the log file.
    log::warn!("just a warning");
    assert!(!paths.error_log_file().exists());
}
