// tests/job_store.rs

mod common;
use crate::common::{read_job_file, write_job_file};

use std::fs;

use taskfarm::errors::TaskfarmError;
use taskfarm::store::{split_first_line, split_lines, Claim, FileJobStore, JobStore};

#[test]
fn claim_pops_first_line_and_persists_the_rest() {
    let (_dir, path) = write_job_file(&["echo a", "echo b", "echo c"]);
    let store = FileJobStore::new(&path);

    assert_eq!(store.claim().unwrap(), Claim::Job("echo a".to_string()));
    assert_eq!(read_job_file(&path), "echo b\necho c\n");

    assert_eq!(store.claim().unwrap(), Claim::Job("echo b".to_string()));
    assert_eq!(read_job_file(&path), "echo c\n");

    assert_eq!(store.claim().unwrap(), Claim::Job("echo c".to_string()));
    assert_eq!(read_job_file(&path), "");
}

#[test]
fn claim_on_empty_file_leaves_it_untouched() {
    let (_dir, path) = write_job_file(&[]);
    let store = FileJobStore::new(&path);

    assert_eq!(store.claim().unwrap(), Claim::Empty);
    assert_eq!(store.claim().unwrap(), Claim::Empty);
    assert_eq!(read_job_file(&path), "");
}

#[test]
fn missing_file_is_store_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");
    let store = FileJobStore::new(&path);

    match store.claim() {
        Err(TaskfarmError::StoreNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected StoreNotFound, got {other:?}"),
    }
    assert!(!path.exists(), "claim must not create the job file");
}

#[test]
fn last_line_without_newline_is_claimed_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.txt");
    fs::write(&path, "echo a\necho b").unwrap();
    let store = FileJobStore::new(&path);

    assert_eq!(store.claim().unwrap(), Claim::Job("echo a".to_string()));
    assert_eq!(read_job_file(&path), "echo b");
    assert_eq!(store.claim().unwrap(), Claim::Job("echo b".to_string()));
    assert_eq!(read_job_file(&path), "");
    assert_eq!(store.claim().unwrap(), Claim::Empty);
}

#[test]
fn crlf_terminators_are_stripped_from_the_job_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.txt");
    fs::write(&path, "echo a\r\necho b\r\n").unwrap();
    let store = FileJobStore::new(&path);

    assert_eq!(store.claim().unwrap(), Claim::Job("echo a".to_string()));
    // Remainder is written back byte for byte.
    assert_eq!(read_job_file(&path), "echo b\r\n");
}

#[test]
fn blank_line_is_a_job_not_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.txt");
    fs::write(&path, "\necho a\n").unwrap();
    let store = FileJobStore::new(&path);

    assert_eq!(store.claim().unwrap(), Claim::Job(String::new()));
    assert_eq!(read_job_file(&path), "echo a\n");
}

#[test]
fn pending_reads_without_modifying() {
    let (_dir, path) = write_job_file(&["echo a", "", "echo b"]);
    let store = FileJobStore::new(&path);

    assert_eq!(
        store.pending().unwrap(),
        vec!["echo a".to_string(), String::new(), "echo b".to_string()]
    );
    assert_eq!(read_job_file(&path), "echo a\n\necho b\n");
}

#[test]
fn append_adds_to_the_back_and_terminates_the_last_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.txt");
    fs::write(&path, "echo a").unwrap();
    let store = FileJobStore::new(&path);

    store
        .append(&["echo b".to_string(), "echo c".to_string()])
        .unwrap();
    assert_eq!(read_job_file(&path), "echo a\necho b\necho c\n");

    assert_eq!(store.claim().unwrap(), Claim::Job("echo a".to_string()));
    assert_eq!(read_job_file(&path), "echo b\necho c\n");
}

#[test]
fn append_to_empty_file() {
    let (_dir, path) = write_job_file(&[]);
    let store = FileJobStore::new(&path);

    store.append(&["echo z".to_string()]).unwrap();
    assert_eq!(read_job_file(&path), "echo z\n");
}

#[test]
fn split_helpers() {
    assert_eq!(split_first_line(b""), None);
    assert_eq!(
        split_first_line(b"a\nb\n"),
        Some((Claim::Job("a".to_string()), &b"b\n"[..]))
    );
    assert_eq!(
        split_first_line(b"\n"),
        Some((Claim::Job(String::new()), &b""[..]))
    );
    assert_eq!(split_lines(b"a\nb"), vec!["a".to_string(), "b".to_string()]);
    assert!(split_lines(b"").is_empty());
}

#[test]
fn invalid_utf8_line_is_claimed_as_undecodable_and_remainder_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.txt");
    fs::write(&path, b"echo \xff\n\xfe tail\n").unwrap();
    let store = FileJobStore::new(&path);

    assert_eq!(
        store.claim().unwrap(),
        Claim::Undecodable("echo \u{fffd}".to_string())
    );
    assert_eq!(fs::read(&path).unwrap(), b"\xfe tail\n");
    assert_eq!(
        store.claim().unwrap(),
        Claim::Undecodable("\u{fffd} tail".to_string())
    );
    assert_eq!(store.claim().unwrap(), Claim::Empty);
}
