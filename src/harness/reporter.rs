//! Reporting sinks for check results.

use serde::Serialize;

use crate::ui::UserInterface;

/// Receives events, timers and log lines from a run.
pub trait Reporter {
    /// A titled event, e.g. `PASS: AppDetected`.
    fn event(&mut self, title: &str, description: &str);

    /// A named timer value in milliseconds.
    fn timer(&mut self, name: &str, millis: u64);

    /// A plain diagnostic line.
    fn log(&mut self, line: &str);
}

/// One reported item, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    Event { title: String, description: String },
    Timer { name: String, millis: u64 },
    Log { line: String },
}

/// Keeps every entry in memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingReporter {
    entries: Vec<ReportEntry>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Titles of all events, in order.
    pub fn event_titles(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                ReportEntry::Event { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Last value recorded for timer `name`.
    pub fn timer_value(&self, name: &str) -> Option<u64> {
        self.entries.iter().rev().find_map(|e| match e {
            ReportEntry::Timer { name: n, millis } if n == name => Some(*millis),
            _ => None,
        })
    }

    pub fn logs(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                ReportEntry::Log { line } => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn event(&mut self, title: &str, description: &str) {
        self.entries.push(ReportEntry::Event {
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    fn timer(&mut self, name: &str, millis: u64) {
        self.entries.push(ReportEntry::Timer {
            name: name.to_string(),
            millis,
        });
    }

    fn log(&mut self, line: &str) {
        self.entries.push(ReportEntry::Log {
            line: line.to_string(),
        });
    }
}

/// Prints to the console and records everything.
pub struct ConsoleReporter<'a> {
    ui: &'a mut dyn UserInterface,
    record: RecordingReporter,
}

impl<'a> ConsoleReporter<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self {
            ui,
            record: RecordingReporter::new(),
        }
    }

    /// The entries recorded so far.
    pub fn record(&self) -> &RecordingReporter {
        &self.record
    }

    pub fn into_record(self) -> RecordingReporter {
        self.record
    }
}

impl Reporter for ConsoleReporter<'_> {
    fn event(&mut self, title: &str, description: &str) {
        if title.starts_with("PASS") {
            self.ui.success(title);
        } else if title.starts_with("FAIL") || title.starts_with("ERROR") {
            self.ui.error(&format!("{}: {}", title, description));
        } else {
            self.ui.message(title);
        }
        self.ui.detail(description);
        self.record.event(title, description);
    }

    fn timer(&mut self, name: &str, millis: u64) {
        self.ui.detail(&format!("timer {} = {}", name, millis));
        self.record.timer(name, millis);
    }

    fn log(&mut self, line: &str) {
        self.ui.message(line);
        self.record.log(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn recording_keeps_order() {
        let mut reporter = RecordingReporter::new();
        reporter.log("start");
        reporter.timer("AppDetected", 0);
        reporter.event("PASS: AppDetected", "found");

        assert_eq!(reporter.entries().len(), 3);
        assert_eq!(reporter.logs(), vec!["start"]);
        assert_eq!(reporter.event_titles(), vec!["PASS: AppDetected"]);
        assert_eq!(reporter.timer_value("AppDetected"), Some(0));
        assert_eq!(reporter.timer_value("Other"), None);
    }

    #[test]
    fn entries_serialize_with_kind_tag() {
        let mut reporter = RecordingReporter::new();
        reporter.timer("AppVersion", 10000);
        let json = serde_json::to_value(&reporter).unwrap();
        assert_eq!(json["entries"][0]["kind"], "timer");
        assert_eq!(json["entries"][0]["millis"], 10000);
    }

    #[test]
    fn console_routes_by_outcome() {
        let mut ui = MockUI::new();
        let mut reporter = ConsoleReporter::new(&mut ui);
        reporter.event("PASS: A", "ok");
        reporter.event("FAIL: B", "expected x");
        reporter.event("INFO: C", "skipped");
        reporter.log("line");
        let record = reporter.into_record();

        assert_eq!(record.event_titles().len(), 3);
        assert_eq!(ui.successes(), ["PASS: A"]);
        assert_eq!(ui.errors(), ["FAIL: B: expected x"]);
        assert!(ui.messages().contains(&"INFO: C".to_string()));
        assert!(ui.messages().contains(&"line".to_string()));
    }
}
