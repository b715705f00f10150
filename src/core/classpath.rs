//! The three classpath roles a descriptor is inferred from.

use std::fmt;
use std::path::PathBuf;

/// Which view of the dependencies a classpath represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClasspathRole {
    /// Compile-time visibility.
    Static,
    /// Re-exported (api-like) visibility.
    Transitive,
    /// Run-time visibility.
    Runtime,
}

impl ClasspathRole {
    /// Listing order used by generation.
    pub const ALL: [ClasspathRole; 3] = [
        ClasspathRole::Static,
        ClasspathRole::Transitive,
        ClasspathRole::Runtime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClasspathRole::Static => "static",
            ClasspathRole::Transitive => "transitive",
            ClasspathRole::Runtime => "runtime",
        }
    }
}

impl fmt::Display for ClasspathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved artifact paths for each role, in resolver order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpaths {
    pub static_path: Vec<PathBuf>,
    pub transitive: Vec<PathBuf>,
    pub runtime: Vec<PathBuf>,
}

impl Classpaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ClasspathRole) -> &[PathBuf] {
        match role {
            ClasspathRole::Static => &self.static_path,
            ClasspathRole::Transitive => &self.transitive,
            ClasspathRole::Runtime => &self.runtime,
        }
    }

    pub fn get_mut(&mut self, role: ClasspathRole) -> &mut Vec<PathBuf> {
        match role {
            ClasspathRole::Static => &mut self.static_path,
            ClasspathRole::Transitive => &mut self.transitive,
            ClasspathRole::Runtime => &mut self.runtime,
        }
    }

    /// True when no role has any entry.
    pub fn is_empty(&self) -> bool {
        ClasspathRole::ALL.iter().all(|role| self.get(*role).is_empty())
    }

    pub fn with(mut self, role: ClasspathRole, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.get_mut(role).extend(paths);
        self
    }
}
