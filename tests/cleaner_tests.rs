//! Deletion worker behavior, in direct-delete mode so nothing touches a real
//! recycle bin.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use insomnia::cleaner::{self, CleanJob, CleanerEvent};

fn job(directories: BTreeMap<String, bool>, skip_errors: bool) -> CleanJob {
    CleanJob {
        directories,
        move_to_trash: false,
        skip_errors,
    }
}

/// Run a job to completion and return every event in order.
fn drain(job: CleanJob) -> Vec<CleanerEvent> {
    let handle = cleaner::spawn(job);
    let mut events = Vec::new();
    while let Some(event) = handle.recv() {
        let finished = event == CleanerEvent::Finished;
        events.push(event);
        if finished {
            break;
        }
    }
    handle.join();
    events
}

fn populate(dir: &Path) {
    fs::write(dir.join("a.tmp"), "a").expect("file");
    fs::write(dir.join("b.log"), "b").expect("file");
    let nested = dir.join("nested");
    fs::create_dir(&nested).expect("dir");
    fs::write(nested.join("deep.txt"), "deep").expect("file");
}

#[test]
fn enabled_directory_loses_its_immediate_children() {
    let root = tempfile::tempdir().expect("tempdir");
    populate(root.path());

    let directories =
        BTreeMap::from([(root.path().to_string_lossy().into_owned(), true)]);
    let events = drain(job(directories, false));

    assert!(root.path().exists(), "the directory itself survives");
    assert_eq!(fs::read_dir(root.path()).expect("read").count(), 0);
    assert_eq!(events.last(), Some(&CleanerEvent::Finished));
    assert!(events.contains(&CleanerEvent::Progress(100)));
    assert!(
        !events.iter().any(|e| matches!(e, CleanerEvent::Error(_))),
        "unexpected errors: {events:?}"
    );
}

#[test]
fn disabled_directory_is_untouched() {
    let root = tempfile::tempdir().expect("tempdir");
    populate(root.path());

    let directories =
        BTreeMap::from([(root.path().to_string_lossy().into_owned(), false)]);
    let events = drain(job(directories, false));

    assert_eq!(fs::read_dir(root.path()).expect("read").count(), 3);
    assert_eq!(events, vec![CleanerEvent::Finished]);
}

#[test]
fn missing_directory_is_skipped_silently() {
    let root = tempfile::tempdir().expect("tempdir");
    let missing = root.path().join("does-not-exist");

    let directories = BTreeMap::from([(missing.to_string_lossy().into_owned(), true)]);
    let events = drain(job(directories, false));

    assert_eq!(
        events,
        vec![CleanerEvent::Progress(100), CleanerEvent::Finished]
    );
}

#[test]
fn unlistable_path_raises_one_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let file = root.path().join("not-a-directory");
    fs::write(&file, "plain file").expect("file");

    let directories = BTreeMap::from([(file.to_string_lossy().into_owned(), true)]);
    let events = drain(job(directories, false));

    let errors: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, CleanerEvent::Error(_)))
        .collect();
    assert_eq!(errors.len(), 1);
    match errors[0] {
        CleanerEvent::Error(message) => assert!(message.starts_with("Error accessing")),
        _ => unreachable!(),
    }
}

#[test]
fn skip_errors_swallows_listing_failures() {
    let root = tempfile::tempdir().expect("tempdir");
    let file = root.path().join("not-a-directory");
    fs::write(&file, "plain file").expect("file");

    let directories = BTreeMap::from([(file.to_string_lossy().into_owned(), true)]);
    let events = drain(job(directories, true));

    assert_eq!(
        events,
        vec![CleanerEvent::Progress(100), CleanerEvent::Finished]
    );
}

#[test]
fn progress_is_monotonic_across_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut directories = BTreeMap::new();
    for name in ["one", "two", "three"] {
        let dir = root.path().join(name);
        fs::create_dir(&dir).expect("dir");
        fs::write(dir.join("x"), "x").expect("file");
        directories.insert(dir.to_string_lossy().into_owned(), true);
    }

    let events = drain(job(directories, false));
    let reported: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            CleanerEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(reported.len(), 3);
    assert!(reported.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(reported.last(), Some(&100));
}

#[test]
fn directory_keys_are_env_expanded() {
    let root = tempfile::tempdir().expect("tempdir");
    populate(root.path());
    unsafe {
        std::env::set_var("INSOMNIA_CLEAN_TEST_DIR", root.path());
    }

    let directories = BTreeMap::from([("%INSOMNIA_CLEAN_TEST_DIR%".to_owned(), true)]);
    let events = drain(job(directories, false));

    assert_eq!(fs::read_dir(root.path()).expect("read").count(), 0);
    assert_eq!(events.last(), Some(&CleanerEvent::Finished));
}
