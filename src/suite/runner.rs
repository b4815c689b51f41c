//! The four-phase registry and application suite.
//!
//! 1. Seed the demo key and check reads and writes against it
//! 2. Locate the target application
//! 3. Write its status and check its version
//! 4. Start and stop it when a launch path is known

use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::config::ScoutConfig;
use crate::discovery::{
    versions_equal, AppLocator, AppQuery, DiscoveryResult, ExeMetadata, FileProbe, SearchPlan,
};
use crate::error::{Result, ScoutError};
use crate::harness::{AssertionHarness, Reporter};
use crate::registry::RegistryPort;
use crate::status::{AppStatusWriter, EnvVarSink};
use crate::suite::demo::run_demo_checks;
use crate::suite::launcher::{AppLauncher, LaunchSpec};

/// Outcome of a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    /// Why the run stopped early, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub app: DiscoveryResult,
}

impl SuiteSummary {
    /// True when nothing failed and the run was not aborted.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.aborted.is_none()
    }
}

/// Everything the suite reads from and writes to.
pub struct SuiteDeps<'a> {
    pub registry: &'a dyn RegistryPort,
    pub files: &'a dyn FileProbe,
    pub metadata: &'a dyn ExeMetadata,
    pub env: &'a dyn EnvVarSink,
    pub launcher: &'a mut dyn AppLauncher,
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Runs the suite against one configuration.
pub struct SuiteRunner<'a> {
    config: &'a ScoutConfig,
    deps: SuiteDeps<'a>,
    env_lookup: Option<EnvLookup<'a>>,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(config: &'a ScoutConfig, deps: SuiteDeps<'a>) -> Self {
        Self {
            config,
            deps,
            env_lookup: None,
        }
    }

    /// Replace the environment used to expand filesystem fallbacks.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env_lookup = Some(Box::new(lookup));
        self
    }

    /// Run every phase. Aborts end the run early and are recorded in the
    /// summary rather than returned.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> SuiteSummary {
        let mut harness = AssertionHarness::new(reporter);
        let mut app = DiscoveryResult::not_found();

        let outcome = self.run_phases(&mut harness, &mut app);
        let aborted = match outcome {
            Ok(()) => {
                harness.log("== Suite complete ==");
                None
            }
            Err(e) => {
                let message = match e {
                    ScoutError::RunAborted { message } => message,
                    other => other.to_string(),
                };
                harness.log(&format!("== Suite aborted: {} ==", message));
                Some(message)
            }
        };

        SuiteSummary {
            passed: harness.passed(),
            failed: harness.failed(),
            aborted,
            app,
        }
    }

    fn run_phases(
        &mut self,
        harness: &mut AssertionHarness<'_>,
        app: &mut DiscoveryResult,
    ) -> Result<()> {
        let registry = self.deps.registry;
        let settings = &self.config.registry;

        harness.log("== Registry & App Assertion Suite ==");
        harness.log(&format!("Using HKCU base: {}", settings.base_key));

        harness.log("[1/4] Preparing demo registry data...");
        run_demo_checks(harness, registry, &settings.demo_key())?;

        harness.log("[2/4] Detecting target app from registry...");
        *app = self.detect(harness)?;

        harness.log("[3/4] Logging app status and setting env var...");
        self.write_status(harness, app)?;
        self.check_version(harness, app)?;

        harness.log("[4/4] Conditional START/STOP...");
        self.start_stop(harness, app)
    }

    fn detect(&self, harness: &mut AssertionHarness<'_>) -> Result<DiscoveryResult> {
        let target = &self.config.target;
        let query = AppQuery::new(&target.display_name_pattern, &target.exe_file_name);
        let plan = SearchPlan::standard(self.config.search.known_paths.clone());
        let mut locator = AppLocator::new(self.deps.registry, self.deps.files, self.deps.metadata)
            .with_plan(plan);
        if let Some(lookup) = &self.env_lookup {
            locator = locator.with_env(|key: &str| lookup(key));
        }

        let app = locator.locate(&query)?;
        if app.found {
            harness.pass(
                "AppDetected",
                &format!(
                    "Found '{}' v{}\nLaunchPath: {}",
                    app.display_name, app.version, app.launch_path
                ),
            );
            return Ok(app);
        }

        let status = self.status_writer();
        status.write(&app)?;
        let description = format!(
            "Could not locate '{}' ({}).",
            target.display_name_pattern, target.exe_file_name
        );
        harness.fail("AppDetected", &description);
        if self.config.policy.abort_if_missing {
            return Err(harness.abort(&format!(
                "Required app not installed or not discoverable: '{}' ({}).",
                target.display_name_pattern, target.exe_file_name
            )));
        }
        harness.log("App not found; continuing without START/STOP.");
        Ok(app)
    }

    fn status_writer(&self) -> AppStatusWriter<'_> {
        AppStatusWriter::new(
            self.deps.registry,
            self.deps.env,
            &self.config.registry.status_key(),
            &self.config.registry.env_var_name,
        )
    }

    fn write_status(
        &self,
        harness: &mut AssertionHarness<'_>,
        app: &DiscoveryResult,
    ) -> Result<()> {
        if !app.found {
            harness.info("AppStatus_Logged", "App missing; basic status already written.");
            return Ok(());
        }

        let status = self.status_writer();
        status.write(app)?;
        harness.pass(
            "AppStatus_Logged",
            &format!(
                "{} updated, {} set.",
                status.status_key(),
                status.env_var_name()
            ),
        );
        Ok(())
    }

    fn check_version(
        &self,
        harness: &mut AssertionHarness<'_>,
        app: &DiscoveryResult,
    ) -> Result<()> {
        let Some(expected) = &self.config.target.expected_version else {
            return Ok(());
        };
        if !app.found {
            return Ok(());
        }

        if versions_equal(&app.version, expected) {
            harness.pass(
                "AppVersion",
                &format!(
                    "Detected version '{}' matches expected '{}'.",
                    app.version, expected
                ),
            );
            return Ok(());
        }

        let message = format!(
            "Detected version '{}' does not match expected '{}'.",
            app.version, expected
        );
        harness.fail("AppVersion", &message);
        if self.config.policy.abort_if_version_mismatch {
            return Err(harness.abort(&message));
        }
        Ok(())
    }

    fn start_stop(&mut self, harness: &mut AssertionHarness<'_>, app: &DiscoveryResult) -> Result<()> {
        let launchable =
            app.found && app.has_launch_path() && self.deps.files.is_file(&app.launch_path);
        if !launchable {
            harness.log("No valid LaunchPath. Skipping START/STOP.");
            harness.info("App_StartStop", "LaunchPath not available; start/stop skipped.");
            return Ok(());
        }

        let target = &self.config.target;
        let launch = &self.config.launch;
        let spec = LaunchSpec {
            launch_path: app.launch_path.clone(),
            process_name: target.process_name.clone(),
            window_title: target.window_title.clone(),
            window_class: target.window_class.clone(),
            start_timeout: Duration::from_secs(launch.start_timeout_secs),
            stop_timeout: Duration::from_secs(launch.stop_timeout_secs),
        };

        harness.event("Starting app", &spec.launch_path);
        self.deps.launcher.start(&spec)?;
        harness.log(&format!(
            "App started, waiting {} seconds...",
            launch.settle_secs
        ));
        if launch.settle_secs > 0 {
            thread::sleep(Duration::from_secs(launch.settle_secs));
        }
        self.deps.launcher.stop()?;
        harness.pass(
            "App_StartStop",
            &format!("Process '{}' started and stopped.", target.process_name),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{StaticFiles, StaticMetadata};
    use crate::harness::{RecordingReporter, FAIL_TIMER_MS, PASS_TIMER_MS};
    use crate::registry::{paths, MockRegistry};
    use crate::status::RecordingEnvSink;
    use crate::suite::launcher::MockLauncher;

    const EXE_PATH: &str = r"C:\VSCode\Code.exe";

    fn config() -> ScoutConfig {
        let mut config = ScoutConfig::default();
        config.launch.settle_secs = 0;
        config
    }

    fn install_vscode(reg: &MockRegistry, version: &str) {
        let key = format!("{}\\vscode", paths::HKCU_UNINSTALL);
        reg.insert_string(&key, "DisplayName", "Visual Studio Code (User)");
        reg.insert_string(&key, "DisplayVersion", version);
        reg.insert_string(&key, "InstallLocation", r"C:\VSCode");
    }

    struct Fixture {
        reg: MockRegistry,
        files: StaticFiles,
        metadata: StaticMetadata,
        env: RecordingEnvSink,
        launcher: MockLauncher,
        reporter: RecordingReporter,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                reg: MockRegistry::new(),
                files: StaticFiles::new([EXE_PATH]),
                metadata: StaticMetadata::new(),
                env: RecordingEnvSink::new(),
                launcher: MockLauncher::new(),
                reporter: RecordingReporter::new(),
            }
        }

        fn run(&mut self, config: &ScoutConfig) -> SuiteSummary {
            let deps = SuiteDeps {
                registry: &self.reg,
                files: &self.files,
                metadata: &self.metadata,
                env: &self.env,
                launcher: &mut self.launcher,
            };
            SuiteRunner::new(config, deps)
                .with_env(|_: &str| None)
                .run(&mut self.reporter)
        }
    }

    #[test]
    fn installed_app_passes_every_phase() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "1.95.0");

        let summary = fx.run(&config());

        assert!(summary.is_success(), "{:?}", summary);
        assert_eq!(summary.app.launch_path, EXE_PATH);
        for timer in ["AppDetected", "AppStatus_Logged", "AppVersion", "App_StartStop"] {
            assert_eq!(fx.reporter.timer_value(timer), Some(PASS_TIMER_MS), "{}", timer);
        }
        assert_eq!(fx.launcher.started().len(), 1);
        assert_eq!(fx.launcher.stops(), 1);
        assert_eq!(
            fx.reg
                .value(r"HKCU\Software\LoginVSI\AppStatus", "Installed")
                .as_deref(),
            Some("Yes")
        );
        assert_eq!(fx.env.get("LOGINVSI_APP_VERSION").as_deref(), Some("1.95.0"));
        assert!(fx.reporter.logs().contains(&"== Suite complete =="));
    }

    #[test]
    fn missing_app_continues_degraded_by_default() {
        let mut fx = Fixture::new();

        let summary = fx.run(&config());

        assert!(summary.aborted.is_none());
        assert_eq!(summary.failed, 1);
        assert_eq!(fx.reporter.timer_value("AppDetected"), Some(FAIL_TIMER_MS));
        assert_eq!(fx.reporter.timer_value("AppStatus_Logged"), Some(PASS_TIMER_MS));
        assert_eq!(fx.reporter.timer_value("AppVersion"), None);
        assert!(fx.reporter.event_titles().contains(&"INFO: App_StartStop"));
        assert!(fx.launcher.started().is_empty());
        assert_eq!(
            fx.reg
                .value(r"HKCU\Software\LoginVSI\AppStatus", "Installed")
                .as_deref(),
            Some("No")
        );
        assert_eq!(fx.env.get("LOGINVSI_APP_VERSION").as_deref(), Some("notInstalled"));
    }

    #[test]
    fn missing_app_aborts_when_required() {
        let mut fx = Fixture::new();
        let mut config = config();
        config.policy.abort_if_missing = true;

        let summary = fx.run(&config);

        let reason = summary.aborted.unwrap();
        assert!(reason.starts_with("Required app not installed"));
        assert_eq!(fx.reporter.timer_value("AppStatus_Logged"), None);
        // Status is still written before aborting.
        assert_eq!(fx.env.get("LOGINVSI_APP_VERSION").as_deref(), Some("notInstalled"));
    }

    #[test]
    fn version_mismatch_aborts_before_start() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "1.94.2");

        let summary = fx.run(&config());

        assert_eq!(
            summary.aborted.as_deref(),
            Some("Detected version '1.94.2' does not match expected '1.95.0'.")
        );
        assert_eq!(fx.reporter.timer_value("AppVersion"), Some(FAIL_TIMER_MS));
        assert!(fx.launcher.started().is_empty());
    }

    #[test]
    fn version_mismatch_can_be_tolerated() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "1.94.2");
        let mut config = config();
        config.policy.abort_if_version_mismatch = false;

        let summary = fx.run(&config);

        assert!(summary.aborted.is_none());
        assert_eq!(summary.failed, 1);
        assert_eq!(fx.launcher.stops(), 1);
    }

    #[test]
    fn unset_expected_version_skips_check() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "0.1");
        let mut config = config();
        config.target.expected_version = None;

        let summary = fx.run(&config);

        assert!(summary.is_success());
        assert_eq!(fx.reporter.timer_value("AppVersion"), None);
    }

    #[test]
    fn launch_failure_aborts() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "1.95.0");
        fx.launcher = MockLauncher::failing("access denied");

        let summary = fx.run(&config());

        assert!(summary.aborted.unwrap().contains("access denied"));
        assert_eq!(fx.reporter.timer_value("App_StartStop"), None);
    }

    #[test]
    fn registry_timeout_during_detection_aborts() {
        let mut fx = Fixture::new();
        fx.reg.fail_with_timeout(paths::HKCU_UNINSTALL);

        let summary = fx.run(&config());

        assert!(summary.aborted.unwrap().contains("timed out"));
        assert_eq!(fx.reporter.timer_value("AppDetected"), None);
    }

    #[test]
    fn summary_serializes_to_json() {
        let mut fx = Fixture::new();
        install_vscode(&fx.reg, "1.95.0");
        let summary = fx.run(&config());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["app"]["version"], "1.95.0");
        assert!(json.get("aborted").is_none());
    }
}
