//! Starting and stopping the target application.

use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, ScoutError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a fresh process must survive to count as started.
const STARTUP_PROBE: Duration = Duration::from_millis(500);

/// What to start and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub launch_path: String,
    pub process_name: String,
    pub window_title: Option<String>,
    pub window_class: Option<String>,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
}

/// Process lifecycle control.
pub trait AppLauncher {
    /// Start the application described by `spec`.
    fn start(&mut self, spec: &LaunchSpec) -> Result<()>;

    /// Stop whatever `start` launched.
    fn stop(&mut self) -> Result<()>;
}

/// Launches the executable as a child process.
#[derive(Debug, Default)]
pub struct SpawnLauncher {
    running: Option<(Child, LaunchSpec)>,
}

impl SpawnLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn launch_failed(spec: &LaunchSpec, message: impl Into<String>) -> ScoutError {
    ScoutError::LaunchFailed {
        target: spec.process_name.clone(),
        message: message.into(),
    }
}

impl AppLauncher for SpawnLauncher {
    fn start(&mut self, spec: &LaunchSpec) -> Result<()> {
        tracing::debug!("Starting {}", spec.launch_path);
        let mut child = Command::new(&spec.launch_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| launch_failed(spec, format!("{}: {}", spec.launch_path, e)))?;

        let probe = STARTUP_PROBE.min(spec.start_timeout);
        let deadline = Instant::now() + probe;
        while Instant::now() < deadline {
            if let Some(status) = child.try_wait()? {
                // Launchers that hand off to an existing instance exit cleanly.
                if status.success() {
                    tracing::debug!("{} exited immediately with success", spec.launch_path);
                    return Ok(());
                }
                return Err(launch_failed(spec, format!("exited during startup with {}", status)));
            }
            thread::sleep(POLL_INTERVAL);
        }

        self.running = Some((child, spec.clone()));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some((mut child, spec)) = self.running.take() else {
            return Ok(());
        };

        if child.try_wait()?.is_none() {
            // Already-exited children make kill fail; ignore that.
            let _ = child.kill();
        }

        let deadline = Instant::now() + spec.stop_timeout;
        loop {
            if child.try_wait()?.is_some() {
                tracing::debug!("{} stopped", spec.process_name);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(launch_failed(
                    &spec,
                    format!("still running after {:?}", spec.stop_timeout),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Records lifecycle calls, for tests.
#[derive(Debug, Default)]
pub struct MockLauncher {
    started: Vec<LaunchSpec>,
    stops: usize,
    fail_start: Option<String>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `start` fail with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_start: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn started(&self) -> &[LaunchSpec] {
        &self.started
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl AppLauncher for MockLauncher {
    fn start(&mut self, spec: &LaunchSpec) -> Result<()> {
        self.started.push(spec.clone());
        match &self.fail_start {
            Some(message) => Err(launch_failed(spec, message.clone())),
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.stops += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &str) -> LaunchSpec {
        LaunchSpec {
            launch_path: path.to_string(),
            process_name: "app".to_string(),
            window_title: None,
            window_class: None,
            start_timeout: Duration::from_secs(2),
            stop_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn missing_executable_fails_to_start() {
        let mut launcher = SpawnLauncher::new();
        let err = launcher
            .start(&spec("/nonexistent/appscout-test-binary"))
            .unwrap_err();
        assert!(matches!(err, ScoutError::LaunchFailed { .. }));
    }

    #[test]
    fn stop_without_start_is_noop() {
        let mut launcher = SpawnLauncher::new();
        assert!(launcher.stop().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn starts_and_stops_long_running_process() {
        let mut launcher = SpawnLauncher::new();
        launcher.start(&spec("yes")).unwrap();
        assert!(launcher.running.is_some());
        launcher.stop().unwrap();
        assert!(launcher.running.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn failing_process_is_reported() {
        let mut launcher = SpawnLauncher::new();
        let err = launcher.start(&spec("false")).unwrap_err();
        assert!(err.to_string().contains("exited during startup"));
    }

    #[test]
    fn mock_records_calls() {
        let mut launcher = MockLauncher::new();
        launcher.start(&spec("app.exe")).unwrap();
        launcher.stop().unwrap();
        assert_eq!(launcher.started().len(), 1);
        assert_eq!(launcher.stops(), 1);

        let mut failing = MockLauncher::failing("denied");
        assert!(failing.start(&spec("app.exe")).is_err());
    }
}
