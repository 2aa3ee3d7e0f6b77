#![allow(dead_code)]

pub use taskfarm_test_utils::builders;
pub use taskfarm_test_utils::fake_executor;
pub use taskfarm_test_utils::{init_tracing, read_job_file, with_timeout, write_job_file};
