// tests/claim_concurrency.rs

//! Many claimers, each with its own handle on the same job file, race to
//! empty it. The file lock is per open file description, so threads in one
//! process contend exactly like separate worker processes do.

mod common;
use crate::common::{read_job_file, write_job_file};

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use taskfarm::store::{Claim, FileJobStore, JobStore};

const JOBS: usize = 400;
const CLAIMERS: usize = 8;

fn job_lines() -> Vec<String> {
    (0..JOBS).map(|i| format!("echo job-{i:04}")).collect()
}

fn index_of(job: &str) -> usize {
    job.trim_start_matches("echo job-").parse().unwrap()
}

/// Run `CLAIMERS` threads until the store is empty; return what each claimed,
/// in the order it claimed them.
fn drain_concurrently(path: &std::path::Path) -> Vec<Vec<String>> {
    let barrier = Arc::new(Barrier::new(CLAIMERS));

    let handles: Vec<_> = (0..CLAIMERS)
        .map(|_| {
            let store = FileJobStore::new(path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut claimed = Vec::new();
                loop {
                    match store.claim().expect("claim failed") {
                        Claim::Job(job) => claimed.push(job),
                        Claim::Empty => break,
                        other => panic!("unexpected claim {other:?}"),
                    }
                }
                claimed
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn every_job_is_claimed_exactly_once() {
    let lines = job_lines();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (_dir, path) = write_job_file(&refs);

    let per_claimer = drain_concurrently(&path);

    let all: Vec<String> = per_claimer.iter().flatten().cloned().collect();
    assert_eq!(all.len(), JOBS, "jobs lost or duplicated");

    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(unique.len(), JOBS, "a job was claimed twice");
    for line in &lines {
        assert!(unique.contains(line), "job {line} never claimed");
    }

    assert_eq!(read_job_file(&path), "");
}

#[test]
fn each_claimer_sees_jobs_in_file_order() {
    let lines = job_lines();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (_dir, path) = write_job_file(&refs);

    let per_claimer = drain_concurrently(&path);

    // Claims are serial pops from the front, so any single claimer's
    // sequence must be strictly increasing in file position.
    for claimed in &per_claimer {
        let indices: Vec<usize> = claimed.iter().map(|j| index_of(j)).collect();
        assert!(
            indices.windows(2).all(|w| w[0] < w[1]),
            "claimer saw jobs out of order: {indices:?}"
        );
    }
}

#[test]
fn appends_during_draining_are_not_lost() {
    let (_dir, path) = write_job_file(&["echo job-0000"]);

    let appender = {
        let store = FileJobStore::new(&path);
        thread::spawn(move || {
            for i in 1..100 {
                store.append(&[format!("echo job-{i:04}")]).unwrap();
            }
        })
    };

    let store = FileJobStore::new(&path);
    let mut claimed = Vec::new();
    loop {
        match store.claim().unwrap() {
            Claim::Job(job) => claimed.push(job),
            Claim::Empty if appender.is_finished() => {
                // One last look after the appender is done.
                match store.claim().unwrap() {
                    Claim::Job(job) => claimed.push(job),
                    Claim::Empty => break,
                    other => panic!("unexpected claim {other:?}"),
                }
            }
            Claim::Empty => thread::yield_now(),
            other => panic!("unexpected claim {other:?}"),
        }
    }
    appender.join().unwrap();

    let indices: Vec<usize> = claimed.iter().map(|j| index_of(j)).collect();
    assert_eq!(indices, (0..100).collect::<Vec<_>>());
}

#[test]
fn claims_taken_so_far_are_always_a_prefix_of_the_file() {
    const PER_CLAIMER: usize = 25;

    let lines = job_lines();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (_dir, path) = write_job_file(&refs);

    let barrier = Arc::new(Barrier::new(CLAIMERS));
    let handles: Vec<_> = (0..CLAIMERS)
        .map(|_| {
            let store = FileJobStore::new(&path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_CLAIMER)
                    .map(|_| match store.claim().expect("claim failed") {
                        Claim::Job(job) => index_of(&job),
                        other => panic!("unexpected claim {other:?}"),
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut taken: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    taken.sort_unstable();

    // Whatever the interleaving, no line was skipped over.
    let claimed = CLAIMERS * PER_CLAIMER;
    assert_eq!(taken, (0..claimed).collect::<Vec<_>>());

    let expected: String = lines[claimed..].iter().map(|l| format!("{l}\n")).collect();
    assert_eq!(read_job_file(&path), expected);
}
