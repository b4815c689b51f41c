//! Check harness: PASS / FAIL / ERROR reporting with named timers.
//!
//! # Example
//!
//! ```
//! use appscout::harness::{AssertionHarness, RecordingReporter};
//!
//! let mut reporter = RecordingReporter::new();
//! let mut harness = AssertionHarness::new(&mut reporter);
//! harness.check("Demo: KeyExists", "Key should exist", || Ok(true)).unwrap();
//!
//! assert_eq!(reporter.timer_value("Demo__KeyExists"), Some(0));
//! ```

pub mod assertion;
pub mod reporter;
pub mod sanitize;

pub use assertion::{AssertionHarness, CheckOutcome, FAIL_TIMER_MS, PASS_TIMER_MS};
pub use reporter::{ConsoleReporter, RecordingReporter, ReportEntry, Reporter};
pub use sanitize::{sanitize_timer_name, MAX_TIMER_NAME_LEN};
