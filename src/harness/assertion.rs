//! Boolean checks reported as PASS / FAIL / ERROR.
//!
//! A check closure returns `Ok(true)` for pass and `Ok(false)` for fail. An
//! `Err` is an ERROR: it is reported like a failure and then aborts the run
//! through [`ScoutError::AssertionErrored`].

use crate::error::{Result, ScoutError};
use crate::harness::reporter::Reporter;
use crate::harness::sanitize::sanitize_timer_name;

/// Timer value recorded for a passing check.
pub const PASS_TIMER_MS: u64 = 0;

/// Timer value recorded for a failing check.
pub const FAIL_TIMER_MS: u64 = 10_000;

/// Result of a check that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail,
}

impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }
}

/// Runs checks and forwards their results to a [`Reporter`].
pub struct AssertionHarness<'r> {
    reporter: &'r mut dyn Reporter,
    passed: usize,
    failed: usize,
}

impl<'r> AssertionHarness<'r> {
    pub fn new(reporter: &'r mut dyn Reporter) -> Self {
        Self {
            reporter,
            passed: 0,
            failed: 0,
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Run one named check.
    pub fn check<F>(&mut self, name: &str, expectation: &str, check: F) -> Result<CheckOutcome>
    where
        F: FnOnce() -> Result<bool>,
    {
        match check() {
            Ok(true) => {
                self.pass(name, expectation);
                Ok(CheckOutcome::Pass)
            }
            Ok(false) => {
                self.fail(name, expectation);
                Ok(CheckOutcome::Fail)
            }
            Err(e) => {
                self.timer_fail(name);
                let message = format!("{}. Error: {}", expectation, e);
                self.log(&format!("[ERROR] {} - {}", name, message));
                self.reporter.event(&format!("ERROR: {}", name), &message);
                Err(ScoutError::AssertionErrored {
                    check: name.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Record a pass without running a check.
    pub fn pass(&mut self, name: &str, description: &str) {
        self.passed += 1;
        self.timer_pass(name);
        self.log(&format!("[PASS] {} - {}", name, description));
        self.reporter.event(&format!("PASS: {}", name), description);
    }

    /// Record a failure without running a check.
    pub fn fail(&mut self, name: &str, description: &str) {
        self.failed += 1;
        self.timer_fail(name);
        self.log(&format!("[FAIL] {} - {}", name, description));
        self.reporter.event(&format!("FAIL: {}", name), description);
    }

    /// Record an informational event with a pass timer.
    pub fn info(&mut self, name: &str, description: &str) {
        self.timer_pass(name);
        self.reporter.event(&format!("INFO: {}", name), description);
    }

    pub fn timer_pass(&mut self, name: &str) {
        self.reporter.timer(&sanitize_timer_name(name), PASS_TIMER_MS);
    }

    pub fn timer_fail(&mut self, name: &str) {
        self.reporter.timer(&sanitize_timer_name(name), FAIL_TIMER_MS);
    }

    pub fn event(&mut self, title: &str, description: &str) {
        self.reporter.event(title, description);
    }

    pub fn log(&mut self, line: &str) {
        tracing::info!("{}", line);
        self.reporter.log(line);
    }

    /// Stop the run with `message`.
    pub fn abort(&mut self, message: &str) -> ScoutError {
        self.log(&format!("[ABORT] {}", message));
        ScoutError::RunAborted {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::reporter::{RecordingReporter, ReportEntry};

    #[test]
    fn pass_records_zero_timer_and_event() {
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        let outcome = harness
            .check("Demo: KeyExists", "Key should exist", || Ok(true))
            .unwrap();

        assert_eq!(outcome, CheckOutcome::Pass);
        assert_eq!(harness.passed(), 1);
        assert_eq!(reporter.timer_value("Demo__KeyExists"), Some(PASS_TIMER_MS));
        assert_eq!(reporter.event_titles(), vec!["PASS: Demo: KeyExists"]);
        assert_eq!(reporter.logs(), vec!["[PASS] Demo: KeyExists - Key should exist"]);
    }

    #[test]
    fn fail_records_fail_timer_and_continues() {
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        let first = harness.check("A", "a", || Ok(false)).unwrap();
        let second = harness.check("B", "b", || Ok(true)).unwrap();

        assert_eq!(first, CheckOutcome::Fail);
        assert!(second.is_pass());
        assert_eq!(harness.failed(), 1);
        assert_eq!(harness.passed(), 1);
        assert_eq!(reporter.timer_value("A"), Some(FAIL_TIMER_MS));
    }

    #[test]
    fn error_reports_then_aborts() {
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        let err = harness
            .check("Demo: QueryKey", "Demo key should list values", || {
                Err(ScoutError::RegistryTimeout {
                    command: "reg query HKCU\\X".to_string(),
                    timeout_secs: 10,
                })
            })
            .unwrap_err();

        assert!(err.is_abort());
        assert!(matches!(err, ScoutError::AssertionErrored { ref check, .. } if check == "Demo: QueryKey"));
        assert_eq!(reporter.timer_value("Demo__QueryKey"), Some(FAIL_TIMER_MS));
        assert_eq!(reporter.event_titles(), vec!["ERROR: Demo: QueryKey"]);
        let logged = reporter.logs();
        assert!(logged[0].starts_with("[ERROR] Demo: QueryKey - Demo key should list values. Error:"));
    }

    #[test]
    fn info_uses_pass_timer() {
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);
        harness.info("App_StartStop", "skipped");

        assert_eq!(
            reporter.entries(),
            &[
                ReportEntry::Timer {
                    name: "App_StartStop".to_string(),
                    millis: PASS_TIMER_MS
                },
                ReportEntry::Event {
                    title: "INFO: App_StartStop".to_string(),
                    description: "skipped".to_string()
                },
            ]
        );
    }

    #[test]
    fn abort_builds_run_aborted() {
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);
        let err = harness.abort("missing app");
        assert!(matches!(err, ScoutError::RunAborted { .. }));
        assert_eq!(reporter.logs(), vec!["[ABORT] missing app"]);
    }
}
