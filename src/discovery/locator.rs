//! Ordered multi-strategy application search.
//!
//! [`AppLocator::locate`] walks a [`SearchPlan`] in order and returns the
//! result of the first strategy that finds the application. Later
//! strategies are never started once one succeeds.
//!
//! # Example
//!
//! ```
//! use appscout::discovery::{AppLocator, AppQuery, StaticFiles, StaticMetadata};
//! use appscout::registry::MockRegistry;
//!
//! let reg = MockRegistry::new();
//! let entry = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Uninstall\vscode";
//! reg.insert_string(entry, "DisplayName", "Visual Studio Code (User)");
//! reg.insert_string(entry, "DisplayVersion", "1.95.0");
//! reg.insert_string(entry, "InstallLocation", r"C:\VSCode");
//! let files = StaticFiles::new([r"C:\VSCode\Code.exe"]);
//! let metadata = StaticMetadata::new();
//!
//! let locator = AppLocator::new(&reg, &files, &metadata);
//! let app = locator
//!     .locate(&AppQuery::new("Visual Studio Code*", "Code.exe"))
//!     .unwrap();
//! assert!(app.found);
//! assert_eq!(app.launch_path, r"C:\VSCode\Code.exe");
//! ```

use crate::discovery::files::FileProbe;
use crate::discovery::known_paths::{expand_template, DEFAULT_KNOWN_PATHS};
use crate::discovery::metadata::ExeMetadata;
use crate::discovery::path::{path_from_display_icon, path_from_install_location};
use crate::discovery::result::{DiscoveryResult, DiscoverySource};
use crate::discovery::version::{exe_version, registry_version};
use crate::discovery::wildcard::WildcardPattern;
use crate::error::Result;
use crate::registry::{paths, Presence, RegistryExt, RegistryPort, RegistryView};

/// What to look for.
#[derive(Debug, Clone)]
pub struct AppQuery {
    /// Wildcard tested against each entry's `DisplayName`.
    pub display_name: WildcardPattern,
    /// Executable file name, e.g. `Code.exe`.
    pub exe_file_name: String,
}

impl AppQuery {
    pub fn new(display_name_pattern: &str, exe_file_name: &str) -> Self {
        Self {
            display_name: WildcardPattern::new(display_name_pattern),
            exe_file_name: exe_file_name.to_string(),
        }
    }
}

/// A registry root plus the view to read it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub path: String,
    pub view: RegistryView,
}

impl SearchRoot {
    pub fn new(path: &str, view: RegistryView) -> Self {
        Self {
            path: path.to_string(),
            view,
        }
    }
}

/// One step of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Scan the immediate children of an uninstall root by `DisplayName`.
    Uninstall(SearchRoot),
    /// Read `<root>\<exe>`'s default value in each view, in order.
    AppPaths {
        root: String,
        views: Vec<RegistryView>,
    },
    /// Probe filesystem templates, first existing file wins.
    KnownPaths { templates: Vec<String> },
}

impl Strategy {
    /// Short label for logs.
    pub fn label(&self) -> String {
        match self {
            Strategy::Uninstall(root) => format!("uninstall {} ({})", root.path, root.view),
            Strategy::AppPaths { .. } => "app paths".to_string(),
            Strategy::KnownPaths { .. } => "known paths".to_string(),
        }
    }
}

/// Ordered list of strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub strategies: Vec<Strategy>,
}

impl Default for SearchPlan {
    fn default() -> Self {
        let templates = DEFAULT_KNOWN_PATHS.iter().map(|t| t.to_string()).collect();
        Self::standard(templates)
    }
}

impl SearchPlan {
    /// The standard five-step order with custom filesystem templates:
    /// per-user uninstall, machine uninstall (64-bit then 32-bit view),
    /// App Paths, then the templates.
    pub fn standard(known_paths: Vec<String>) -> Self {
        Self {
            strategies: vec![
                Strategy::Uninstall(SearchRoot::new(
                    paths::HKCU_UNINSTALL,
                    RegistryView::Native,
                )),
                Strategy::Uninstall(SearchRoot::new(
                    paths::HKLM_UNINSTALL,
                    RegistryView::Bits64,
                )),
                Strategy::Uninstall(SearchRoot::new(
                    paths::HKLM_UNINSTALL_WOW64,
                    RegistryView::Bits32,
                )),
                Strategy::AppPaths {
                    root: paths::HKLM_APP_PATHS.to_string(),
                    views: vec![RegistryView::Bits64, RegistryView::Bits32],
                },
                Strategy::KnownPaths {
                    templates: known_paths,
                },
            ],
        }
    }
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Runs a [`SearchPlan`] against a registry and filesystem.
pub struct AppLocator<'a> {
    registry: &'a dyn RegistryPort,
    files: &'a dyn FileProbe,
    metadata: &'a dyn ExeMetadata,
    plan: SearchPlan,
    env: EnvLookup<'a>,
}

impl<'a> AppLocator<'a> {
    /// Locator with the default plan and the process environment.
    pub fn new(
        registry: &'a dyn RegistryPort,
        files: &'a dyn FileProbe,
        metadata: &'a dyn ExeMetadata,
    ) -> Self {
        Self {
            registry,
            files,
            metadata,
            plan: SearchPlan::default(),
            env: Box::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Replace the search plan.
    pub fn with_plan(mut self, plan: SearchPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Replace the environment lookup used to expand filesystem templates.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env = Box::new(env);
        self
    }

    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// Run the plan; the first strategy that finds the app wins.
    ///
    /// Exhausting every strategy is not an error. Registry transport
    /// failures are.
    pub fn locate(&self, query: &AppQuery) -> Result<DiscoveryResult> {
        for strategy in &self.plan.strategies {
            tracing::debug!("Trying {}", strategy.label());
            let result = self.run(strategy, query)?;
            if result.found {
                tracing::info!(
                    "Found '{}' via {} ({})",
                    result.display_name,
                    strategy.label(),
                    result.version_or_unknown()
                );
                return Ok(result);
            }
        }
        tracing::info!(
            "No match for '{}' ({})",
            query.display_name,
            query.exe_file_name
        );
        Ok(DiscoveryResult::not_found())
    }

    fn run(&self, strategy: &Strategy, query: &AppQuery) -> Result<DiscoveryResult> {
        match strategy {
            Strategy::Uninstall(root) => self.from_uninstall_root(root, query),
            Strategy::AppPaths { root, views } => self.from_app_paths(root, views, query),
            Strategy::KnownPaths { templates } => Ok(self.from_known_paths(templates, query)),
        }
    }

    fn from_uninstall_root(&self, root: &SearchRoot, query: &AppQuery) -> Result<DiscoveryResult> {
        if self.registry.key_presence(&root.path, root.view)? == Presence::Absent {
            tracing::debug!("{} does not exist", root.path);
            return Ok(DiscoveryResult::not_found());
        }

        for subkey in self.registry.list_subkeys(&root.path, root.view)? {
            let name = self
                .registry
                .read_value(&subkey, "DisplayName", root.view)?
                .unwrap_or_default();
            let name = name.trim();
            if name.is_empty() || !query.display_name.is_match(name) {
                continue;
            }
            tracing::debug!("'{}' matches at {}", name, subkey);
            return self.describe_entry(&subkey, name, root.view, query);
        }

        Ok(DiscoveryResult::not_found())
    }

    /// Fill a result from the fields of a matching uninstall entry.
    fn describe_entry(
        &self,
        subkey: &str,
        display_name: &str,
        view: RegistryView,
        query: &AppQuery,
    ) -> Result<DiscoveryResult> {
        let version = registry_version(self.registry, subkey, view)?.unwrap_or_default();
        let install_location = self
            .registry
            .read_value(subkey, "InstallLocation", view)?
            .unwrap_or_default();

        let mut launch_path =
            path_from_install_location(self.files, &install_location, &query.exe_file_name);
        if launch_path.is_none() {
            if let Some(icon) = self.registry.read_value(subkey, "DisplayIcon", view)? {
                launch_path = path_from_display_icon(self.files, &icon);
            }
        }
        let launch_path = launch_path.unwrap_or_default();

        let version = if version.is_empty() {
            exe_version(self.metadata, self.files, &launch_path).unwrap_or_default()
        } else {
            version
        };

        Ok(DiscoveryResult {
            found: true,
            display_name: display_name.to_string(),
            version,
            launch_path,
            install_location,
            source_key: subkey.to_string(),
            source: Some(DiscoverySource::Uninstall),
            view: Some(view),
        })
    }

    fn from_app_paths(
        &self,
        root: &str,
        views: &[RegistryView],
        query: &AppQuery,
    ) -> Result<DiscoveryResult> {
        let key = format!("{}\\{}", root.trim_end_matches('\\'), query.exe_file_name);

        for &view in views {
            let Some(path) = self.registry.read_default(&key, view)? else {
                continue;
            };
            let path = path.trim().trim_matches('"');
            if !self.files.is_file(path) {
                tracing::debug!("App Paths ({}) points at missing {}", view, path);
                continue;
            }
            let mut result = DiscoveryResult::from_executable(
                &query.exe_file_name,
                path.to_string(),
                DiscoverySource::AppPaths,
            );
            result.version = exe_version(self.metadata, self.files, path).unwrap_or_default();
            result.view = Some(view);
            return Ok(result);
        }

        Ok(DiscoveryResult::not_found())
    }

    fn from_known_paths(&self, templates: &[String], query: &AppQuery) -> DiscoveryResult {
        for template in templates {
            let candidate = expand_template(template, &query.exe_file_name, &self.env);
            if self.files.is_file(&candidate) {
                let mut result = DiscoveryResult::from_executable(
                    &query.exe_file_name,
                    candidate.clone(),
                    DiscoverySource::KnownPath,
                );
                result.version =
                    exe_version(self.metadata, self.files, &candidate).unwrap_or_default();
                return result;
            }
        }
        DiscoveryResult::not_found()
    }
}
