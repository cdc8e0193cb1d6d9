//! Namespaces: isolated storage partitions under the uploads root.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Store;

/// Name of the namespace used when none is selected.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Keeps ASCII alphanumerics, `.`, `_` and `-`; drops everything else.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// A sanitized namespace name, safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Sanitizes `raw` into a namespace name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if nothing usable remains after
    /// sanitization, or the result is `.` or `..`.
    pub fn new(raw: &str) -> Result<Self> {
        let name = sanitize(raw);
        if name.is_empty() || name.chars().all(|c| c == '.') {
            return Err(Error::InvalidNamespace(raw.to_string()));
        }
        Ok(Self(name))
    }

    /// Resolves an optional request parameter, falling back to `default`
    /// when it is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if the selected name is unusable.
    pub fn from_param(param: Option<&str>, default: &Self) -> Result<Self> {
        match param.map(str::trim) {
            Some(raw) if !raw.is_empty() => Self::new(raw),
            _ => Ok(default.clone()),
        }
    }

    /// Returns the namespace name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The uploads root holding one directory per namespace.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Creates a workspace rooted at `root`. Nothing is created on disk yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the uploads root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing `namespace`.
    #[must_use]
    pub fn dir_of(&self, namespace: &Namespace) -> PathBuf {
        self.root.join(namespace.as_str())
    }

    /// Opens the store of `namespace`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the directory cannot be created.
    pub async fn open(&self, namespace: &Namespace) -> Result<Store> {
        let dir = self.dir_of(namespace);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::io(&dir, e))?;
        debug!(namespace = %namespace, dir = %dir.display(), "Namespace directory ready");
        Ok(Store::new(namespace.clone(), dir))
    }
}
