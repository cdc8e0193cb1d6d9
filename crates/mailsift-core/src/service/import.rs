//! Seeding a namespace from an uploaded list.

use bytes::Bytes;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::namespace::{Namespace, Workspace};
use crate::store::{EmailList, PRIMARY_FILE};

/// Only extension accepted for uploads (compared case-insensitively).
pub const ALLOWED_EXTENSION: &str = "txt";

/// A file received from the transport.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name as sent by the client; may include directory components.
    pub file_name: String,
    /// Raw file content.
    pub content: Bytes,
    /// Error reported by the transport while receiving the file, if any.
    pub transfer_error: Option<String>,
}

impl Upload {
    /// Creates a successfully received upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            transfer_error: None,
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Namespace the list was imported into; later operations should use it.
    pub namespace: Namespace,
    /// Name under which the raw upload was kept.
    pub stored_file: String,
    /// Number of non-blank lines in the upload.
    pub line_count: usize,
}

/// Last path component of a client-supplied name. Both `/` and `\` count as
/// separators since browsers on Windows may send either.
fn base_name(file_name: &str) -> &str {
    file_name.rsplit(['/', '\\']).next().unwrap_or(file_name)
}

/// Splits `name` into stem and extension at the last `.`.
///
/// A leading dot is part of the stem, so `.txt` has no extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(i) => (&name[..i], Some(&name[i + 1..])),
    }
}

/// Imports `upload` into a namespace derived from its file name.
///
/// The namespace is the sanitized file stem (`Contacts List!.txt` becomes
/// `ContactsList`), or `hint` if the stem sanitizes to nothing. The raw file
/// is kept under its own name and its content promoted to the primary list.
///
/// # Errors
///
/// - `NoFileProvided` if there is no upload or the transport reported an error
/// - `UnsupportedFormat` if the extension is not `.txt`
/// - `InvalidNamespace` if no namespace can be derived
/// - `Io` if the directory or either file cannot be written
pub async fn import_upload(
    workspace: &Workspace,
    upload: Option<Upload>,
    hint: Option<&Namespace>,
) -> Result<ImportOutcome> {
    let Some(upload) = upload else {
        warn!("Import requested without a file");
        return Err(Error::NoFileProvided);
    };
    if let Some(reason) = &upload.transfer_error {
        warn!(file = %upload.file_name, reason = %reason, "Upload transfer failed");
        return Err(Error::NoFileProvided);
    }

    let file_name = base_name(&upload.file_name).trim();
    if file_name.is_empty() {
        return Err(Error::NoFileProvided);
    }

    let (stem, extension) = split_extension(file_name);
    if !extension.is_some_and(|ext| ext.eq_ignore_ascii_case(ALLOWED_EXTENSION)) {
        warn!(file = %file_name, "Rejected upload with unsupported extension");
        return Err(Error::UnsupportedFormat(file_name.to_string()));
    }

    let namespace = match (Namespace::new(stem), hint) {
        (Ok(ns), _) => ns,
        (Err(_), Some(hint)) => hint.clone(),
        (Err(e), None) => return Err(e),
    };

    let store = workspace.open(&namespace).await?;
    store.write_raw(file_name, &upload.content).await?;
    if file_name != PRIMARY_FILE {
        store.write_raw(PRIMARY_FILE, &upload.content).await?;
    }

    let line_count = EmailList::parse(&String::from_utf8_lossy(&upload.content)).len();
    info!(
        namespace = %namespace,
        file = %file_name,
        lines = line_count,
        "Imported uploaded list"
    );
    Ok(ImportOutcome {
        namespace,
        stored_file: file_name.to_string(),
        line_count,
    })
}
