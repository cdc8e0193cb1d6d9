//! Newline-delimited email files of one namespace.
//!
//! Every bulk write replaces the whole file through a temporary sibling and a
//! rename, so a failed write never leaves a half-written list behind. Adding a
//! single address is the only append.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::namespace::Namespace;

/// Primary working list.
pub const PRIMARY_FILE: &str = "Emails.txt";
/// Invalid addresses from the last clean run.
pub const INVALID_FILE: &str = "adressesNonValides.txt";
/// Deduplicated and sorted output.
pub const SORTED_FILE: &str = "EmailsT.txt";

/// An ordered list of email records, one per line on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailList(Vec<String>);

impl EmailList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses file content: splits on line terminators, trims each line and
    /// drops blank ones.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Serializes to file content: every entry followed by `\n`.
    ///
    /// An empty list serializes to a lone newline.
    #[must_use]
    pub fn to_content(&self) -> String {
        let mut out = self.0.join("\n");
        out.push('\n');
        out
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Appends a record.
    pub fn push(&mut self, record: impl Into<String>) {
        self.0.push(record.into());
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the list, returning its records.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for EmailList {
    fn from(records: Vec<String>) -> Self {
        Self(records)
    }
}

impl<S: Into<String>> FromIterator<S> for EmailList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a EmailList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Reads a list from `path`. A missing file is an empty list.
///
/// # Errors
///
/// Returns an `Io` error for any failure other than the file not existing.
pub async fn load(path: &Path) -> Result<EmailList> {
    match read_raw(path).await? {
        Some(content) => Ok(EmailList::parse(&content)),
        None => Ok(EmailList::new()),
    }
}

/// Reads the raw content of `path`, or `None` if it does not exist.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns an `Io` error for any failure other than the file not existing.
pub async fn read_raw(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Overwrites `path` with `list`.
///
/// # Errors
///
/// Returns an `Io` error if the write fails; the previous content is kept.
pub async fn save(path: &Path, list: &EmailList) -> Result<()> {
    write_raw(path, list.to_content().as_bytes()).await
}

/// Atomically replaces `path` with `bytes` via a temporary sibling file.
///
/// # Errors
///
/// Returns an `Io` error if writing or renaming fails.
pub async fn write_raw(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    let result = async {
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = result {
        error!(path = %path.display(), error = %e, "Failed to write file");
        // Best effort: the temporary file may not exist if the first write failed.
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::io(path, e));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

/// Appends `record` as a new line, creating the file if absent.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be opened or written.
pub async fn append(path: &Path, record: &str) -> Result<()> {
    let result = async {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(format!("{record}\n").as_bytes()).await?;
        file.flush().await
    }
    .await;

    result.map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to append to file");
        Error::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "list".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// File-name conventions and I/O for the files of one namespace.
#[derive(Debug, Clone)]
pub struct Store {
    namespace: Namespace,
    dir: PathBuf,
}

impl Store {
    /// Creates a store over an existing namespace directory.
    ///
    /// Use [`crate::Workspace::open`] to get one with the directory created.
    #[must_use]
    pub const fn new(namespace: Namespace, dir: PathBuf) -> Self {
        Self { namespace, dir }
    }

    /// Namespace this store belongs to.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a file in this namespace.
    #[must_use]
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Loads a list by file name.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub async fn load(&self, file_name: &str) -> Result<EmailList> {
        load(&self.path(file_name)).await
    }

    /// Overwrites a list by file name.
    ///
    /// # Errors
    ///
    /// See [`save`].
    pub async fn save(&self, file_name: &str, list: &EmailList) -> Result<()> {
        save(&self.path(file_name), list).await
    }

    /// Appends one record to a file by name.
    ///
    /// # Errors
    ///
    /// See [`append`].
    pub async fn append(&self, file_name: &str, record: &str) -> Result<()> {
        append(&self.path(file_name), record).await
    }

    /// Raw content of a file by name, if present.
    ///
    /// # Errors
    ///
    /// See [`read_raw`].
    pub async fn read_raw(&self, file_name: &str) -> Result<Option<String>> {
        read_raw(&self.path(file_name)).await
    }

    /// Atomically writes raw bytes to a file by name.
    ///
    /// # Errors
    ///
    /// See [`write_raw`].
    pub async fn write_raw(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        write_raw(&self.path(file_name), bytes).await
    }
}
