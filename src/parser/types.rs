//! Common types for parsers

/// A dependency pinned to an exact version in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    /// Package name as written in the manifest (e.g., "requests", "Django")
    pub name: String,
    /// Version the manifest pins the package to (e.g., "2.31.0")
    pub pinned_version: String,
    /// Line number in the manifest (0-indexed)
    pub line: usize,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, pinned_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pinned_version: pinned_version.into(),
            line: 0,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}
