pub mod builders;
pub mod fake_executor;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tempfile::TempDir;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Create `jobs.txt` in a fresh temp dir, one job per line.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_job_file(jobs: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("jobs.txt");
    let mut contents = String::new();
    for job in jobs {
        contents.push_str(job);
        contents.push('\n');
    }
    fs::write(&path, contents).expect("write job file");
    (dir, path)
}

/// Raw contents of a job file.
pub fn read_job_file(path: &Path) -> String {
    fs::read_to_string(path).expect("read job file")
}
