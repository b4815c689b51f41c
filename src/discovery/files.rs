//! Filesystem existence checks used to accept candidate launch paths.

use std::collections::HashSet;
use std::path::Path;

/// Answers "does this file exist right now?".
pub trait FileProbe {
    fn is_file(&self, path: &str) -> bool;
}

/// Checks the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileProbe for LocalFiles {
    fn is_file(&self, path: &str) -> bool {
        !path.trim().is_empty() && Path::new(path).is_file()
    }
}

/// A fixed set of paths that "exist", compared case-insensitively the way
/// Windows filesystems do.
#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    paths: HashSet<String>,
}

impl StaticFiles {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn insert(&mut self, path: &str) {
        self.paths.insert(path.to_lowercase());
    }
}

impl FileProbe for StaticFiles {
    fn is_file(&self, path: &str) -> bool {
        self.paths.contains(&path.to_lowercase())
    }
}
