// tests/property_claim.rs

use proptest::prelude::*;

use taskfarm::store::{Claim, FileJobStore, JobStore};

// Job lines: printable, no line terminators.
fn job_line() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn draining_returns_lines_in_order(lines in proptest::collection::vec(job_line(), 0..30)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.txt");
        let mut contents = String::new();
        for line in &lines {
            contents.push_str(line);
            contents.push('\n');
        }
        std::fs::write(&path, &contents).unwrap();

        let store = FileJobStore::new(&path);
        let mut claimed = Vec::new();
        loop {
            match store.claim().unwrap() {
                Claim::Job(job) => claimed.push(job),
                Claim::Empty => break,
                other => panic!("unexpected claim {other:?}"),
            }
        }

        prop_assert_eq!(claimed, lines);
        prop_assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn each_claim_removes_exactly_the_first_line(
        lines in proptest::collection::vec(job_line(), 1..20)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.txt");
        let joined: String = lines.iter().map(|l| format!("{l}\n")).collect();
        std::fs::write(&path, &joined).unwrap();

        let store = FileJobStore::new(&path);
        for (i, expected) in lines.iter().enumerate() {
            let claim = store.claim().unwrap();
            prop_assert_eq!(claim, Claim::Job(expected.clone()));

            let remaining: String = lines[i + 1..].iter().map(|l| format!("{l}\n")).collect();
            prop_assert_eq!(std::fs::read_to_string(&path).unwrap(), remaining);
        }
    }
}
