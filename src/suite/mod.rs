//! End-to-end suite: demo key checks, detection, status, start/stop.

pub mod demo;
pub mod launcher;
pub mod runner;

pub use demo::{
    run_demo_checks, seed_demo_key, value_equals_dword, value_equals_string, write_last_run,
    DEMO_DEFAULT, DEMO_DWORD, DEMO_STRING,
};
pub use launcher::{AppLauncher, LaunchSpec, MockLauncher, SpawnLauncher};
pub use runner::{SuiteDeps, SuiteRunner, SuiteSummary};
