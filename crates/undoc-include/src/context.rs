//! Directive processing context.
//!
//! Provides path resolution, build-environment hooks and the warning sink to
//! the directive.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::IncludeSettings;
use crate::reporter::{Location, Reporter};

/// Host build environment the directive reports side effects to.
pub trait BuildEnvironment {
    /// Record that the current document depends on `path`.
    ///
    /// `path` is relative to the source root when the file lives under it.
    fn note_dependency(&mut self, path: &Path);

    /// Register an explicit cross-reference target.
    fn note_explicit_target(&mut self, name: &str, id: &str);
}

/// Build environment that records dependencies and targets in memory.
#[derive(Debug, Default)]
pub struct DependencyTracker {
    dependencies: BTreeSet<PathBuf>,
    targets: BTreeMap<String, String>,
}

impl DependencyTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files noted as dependencies, sorted.
    #[must_use]
    pub fn dependencies(&self) -> &BTreeSet<PathBuf> {
        &self.dependencies
    }

    /// Id registered for a reference name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&str> {
        self.targets.get(name).map(String::as_str)
    }
}

impl BuildEnvironment for DependencyTracker {
    fn note_dependency(&mut self, path: &Path) {
        self.dependencies.insert(path.to_path_buf());
    }

    fn note_explicit_target(&mut self, name: &str, id: &str) {
        self.targets.insert(name.to_owned(), id.to_owned());
    }
}

/// Context handed to the directive for one invocation.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use undoc_include::{CollectingReporter, DependencyTracker, DirectiveContext, IncludeSettings};
///
/// let settings = IncludeSettings::default();
/// let mut env = DependencyTracker::new();
/// let mut reporter = CollectingReporter::new();
/// let ctx = DirectiveContext {
///     source_path: Some(Path::new("docs/guide/index.rst")),
///     base_dir: Path::new("docs/guide"),
///     src_dir: Path::new("docs"),
///     line: 12,
///     settings: &settings,
///     env: &mut env,
///     reporter: &mut reporter,
/// };
///
/// let (rel, abs) = ctx.resolve_path("example.py");
/// assert_eq!(abs, Path::new("docs/guide/example.py"));
/// assert_eq!(rel, Path::new("guide/example.py"));
/// ```
pub struct DirectiveContext<'a> {
    /// Document containing the directive (if known).
    pub source_path: Option<&'a Path>,
    /// Directory of the current document, for relative paths.
    pub base_dir: &'a Path,
    /// Source root, for paths starting with `/`.
    pub src_dir: &'a Path,
    /// Line number where the directive appears (1-indexed).
    pub line: usize,
    /// Project-wide include settings.
    pub settings: &'a IncludeSettings,
    /// Build environment for dependency and target registration.
    pub env: &'a mut dyn BuildEnvironment,
    /// Warning sink.
    pub reporter: &'a mut dyn Reporter,
}

impl DirectiveContext<'_> {
    /// Resolve a directive path argument.
    ///
    /// Returns the path relative to the source root (or the joined path when
    /// it lies outside) and the path to open. Arguments starting with `/` are
    /// taken relative to the source root, everything else relative to the
    /// current document's directory.
    #[must_use]
    pub fn resolve_path(&self, argument: &str) -> (PathBuf, PathBuf) {
        let resolved = normalize(&match argument.strip_prefix('/') {
            Some(rooted) => self.src_dir.join(rooted),
            None => self.base_dir.join(argument),
        });
        let relative = resolved
            .strip_prefix(self.src_dir)
            .map_or_else(|_| resolved.clone(), Path::to_path_buf);
        (relative, resolved)
    }

    /// Location of the directive, if the document is known.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.source_path.map(|source| Location {
            source: source.to_path_buf(),
            line: self.line,
        })
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
