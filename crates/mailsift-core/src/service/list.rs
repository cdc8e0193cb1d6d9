//! List operations over a namespace's primary store.
//!
//! Each call is one load-transform-save cycle: the primary list is read fresh
//! from disk, transformed by [`crate::classify`], and the results are written
//! back before a report is returned.

use tracing::{info, warn};

use crate::classify::{self, DomainBucket};
use crate::error::{Error, Result};
use crate::namespace::{Namespace, Workspace};
use crate::store::{EmailList, INVALID_FILE, PRIMARY_FILE, SORTED_FILE};
use crate::validation::{is_valid_email, normalize};

/// Current content of the primary store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentReport {
    /// Namespace the list belongs to.
    pub namespace: Namespace,
    /// Parsed entries.
    pub emails: EmailList,
    /// File content as stored, `None` when there is no primary file.
    pub raw: Option<String>,
}

impl CurrentReport {
    /// Whether the primary file exists at all.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.raw.is_some()
    }
}

/// Outcome of a clean run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Namespace the list belongs to.
    pub namespace: Namespace,
    /// Valid entries, now the primary list.
    pub valid: EmailList,
    /// Invalid entries written to the invalid-address file.
    pub invalid: EmailList,
    /// File names written by this run.
    pub files: Vec<String>,
}

/// Occurrences of each normalized address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyReport {
    /// Namespace the list belongs to.
    pub namespace: Namespace,
    /// `(address, count)` pairs in first-occurrence order.
    pub entries: Vec<(String, usize)>,
    /// Number of records read.
    pub total: usize,
}

/// Outcome of a dedupe+sort run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    /// Namespace the list belongs to.
    pub namespace: Namespace,
    /// Distinct, sorted entries.
    pub emails: EmailList,
    /// File the result was written to.
    pub file: String,
}

/// One domain file written by a group-by-domain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFile {
    /// Domain of every member.
    pub domain: String,
    /// Name of the file written.
    pub file_name: String,
    /// Members in input order.
    pub emails: EmailList,
}

impl From<DomainBucket> for DomainFile {
    fn from(bucket: DomainBucket) -> Self {
        Self {
            file_name: bucket.file_name(),
            domain: bucket.domain,
            emails: bucket.emails,
        }
    }
}

/// Outcome of a group-by-domain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    /// Namespace the list belongs to.
    pub namespace: Namespace,
    /// Files written, in first-seen domain order.
    pub files: Vec<DomainFile>,
}

impl DomainReport {
    /// Names of the files written.
    #[must_use]
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.file_name.as_str()).collect()
    }
}

/// Reads the primary list without modifying anything.
///
/// # Errors
///
/// Returns an `Io` error if the directory or file cannot be read.
pub async fn current(workspace: &Workspace, namespace: &Namespace) -> Result<CurrentReport> {
    let store = workspace.open(namespace).await?;
    let raw = store.read_raw(PRIMARY_FILE).await?;
    Ok(CurrentReport {
        namespace: namespace.clone(),
        emails: raw.as_deref().map(EmailList::parse).unwrap_or_default(),
        raw,
    })
}

/// Separates valid from invalid addresses.
///
/// The primary list is replaced by the valid, lower-cased entries. The
/// invalid-address file is overwritten only when there is something to put
/// in it; otherwise any earlier one is left alone.
///
/// # Errors
///
/// Returns an `Io` error if a read or either write fails. The two writes are
/// independent: the primary file may already be rewritten when the second
/// write fails.
pub async fn clean(workspace: &Workspace, namespace: &Namespace) -> Result<CleanReport> {
    let store = workspace.open(namespace).await?;
    let emails = store.load(PRIMARY_FILE).await?;
    let classify::Partition { valid, invalid } = classify::partition(&emails);

    let mut files = vec![PRIMARY_FILE.to_string()];
    store.save(PRIMARY_FILE, &valid).await?;
    if !invalid.is_empty() {
        store.save(INVALID_FILE, &invalid).await?;
        files.push(INVALID_FILE.to_string());
    }

    info!(
        namespace = %namespace,
        valid = valid.len(),
        invalid = invalid.len(),
        "Cleaned email list"
    );
    Ok(CleanReport {
        namespace: namespace.clone(),
        valid,
        invalid,
        files,
    })
}

/// Counts occurrences of each address. Read-only.
///
/// # Errors
///
/// Returns an `Io` error if the primary list cannot be read.
pub async fn frequency(workspace: &Workspace, namespace: &Namespace) -> Result<FrequencyReport> {
    let store = workspace.open(namespace).await?;
    let emails = store.load(PRIMARY_FILE).await?;
    let entries = classify::frequency(&emails);

    info!(
        namespace = %namespace,
        total = emails.len(),
        distinct = entries.len(),
        "Computed address frequency"
    );
    Ok(FrequencyReport {
        namespace: namespace.clone(),
        entries,
        total: emails.len(),
    })
}

/// Writes the distinct, sorted addresses to the sorted-list file.
///
/// # Errors
///
/// Returns an `Io` error if the read or the write fails.
pub async fn dedupe_sort(workspace: &Workspace, namespace: &Namespace) -> Result<SortReport> {
    let store = workspace.open(namespace).await?;
    let emails = store.load(PRIMARY_FILE).await?;
    let sorted = classify::dedupe_sort(&emails);
    store.save(SORTED_FILE, &sorted).await?;

    info!(
        namespace = %namespace,
        read = emails.len(),
        distinct = sorted.len(),
        "Deduplicated and sorted email list"
    );
    Ok(SortReport {
        namespace: namespace.clone(),
        emails: sorted,
        file: SORTED_FILE.to_string(),
    })
}

/// Writes one file per domain holding its valid addresses.
///
/// # Errors
///
/// Returns an `Io` error if the read or any bucket write fails. Buckets
/// written before the failure stay on disk.
pub async fn group_by_domain(workspace: &Workspace, namespace: &Namespace) -> Result<DomainReport> {
    let store = workspace.open(namespace).await?;
    let emails = store.load(PRIMARY_FILE).await?;

    let mut files = Vec::new();
    for bucket in classify::group_by_domain(&emails) {
        let file = DomainFile::from(bucket);
        store.save(&file.file_name, &file.emails).await?;
        files.push(file);
    }

    info!(namespace = %namespace, domains = files.len(), "Split email list by domain");
    Ok(DomainReport {
        namespace: namespace.clone(),
        files,
    })
}

/// Appends one address to the primary list.
///
/// The input is trimmed, checked for validity and compared case-insensitively
/// against the current list. Returns the stored, lower-cased address.
///
/// # Errors
///
/// Returns `InvalidAddress` or `Duplicate` for rejected input, or an `Io`
/// error if the list cannot be read or appended to.
pub async fn add_email(workspace: &Workspace, namespace: &Namespace, raw: &str) -> Result<String> {
    let candidate = raw.trim();
    if !is_valid_email(candidate) {
        warn!(namespace = %namespace, address = candidate, "Rejected invalid address");
        return Err(Error::InvalidAddress(candidate.to_string()));
    }

    let store = workspace.open(namespace).await?;
    let emails = store.load(PRIMARY_FILE).await?;
    let normalized = normalize(candidate);
    if emails.iter().any(|e| normalize(e) == normalized) {
        warn!(namespace = %namespace, address = %normalized, "Rejected duplicate address");
        return Err(Error::Duplicate(normalized));
    }

    store.append(PRIMARY_FILE, &normalized).await?;
    info!(namespace = %namespace, address = %normalized, "Added address");
    Ok(normalized)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded(content: &str) -> (tempfile::TempDir, Workspace, Namespace) {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(tmp.path());
        let namespace = Namespace::default();
        let store = workspace.open(&namespace).await.unwrap();
        store.write_raw(PRIMARY_FILE, content.as_bytes()).await.unwrap();
        (tmp, workspace, namespace)
    }

    fn read(workspace: &Workspace, namespace: &Namespace, file: &str) -> String {
        std::fs::read_to_string(workspace.dir_of(namespace).join(file)).unwrap()
    }

    #[tokio::test]
    async fn test_current_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(tmp.path());
        let report = current(&workspace, &Namespace::default()).await.unwrap();
        assert!(!report.exists());
        assert!(report.emails.is_empty());
    }

    #[tokio::test]
    async fn test_current_keeps_raw_content() {
        let (_tmp, ws, ns) = seeded("  A@b.com\n\nc@d.org").await;
        let report = current(&ws, &ns).await.unwrap();
        assert_eq!(report.raw.as_deref(), Some("  A@b.com\n\nc@d.org"));
        assert_eq!(report.emails.as_slice(), ["A@b.com", "c@d.org"]);
    }

    #[tokio::test]
    async fn test_clean_rewrites_primary_and_invalid() {
        let (_tmp, ws, ns) = seeded("A@B.com\nbad\na@b.com\n").await;
        let report = clean(&ws, &ns).await.unwrap();

        assert_eq!(report.valid.as_slice(), ["a@b.com", "a@b.com"]);
        assert_eq!(report.invalid.as_slice(), ["bad"]);
        assert_eq!(report.files, [PRIMARY_FILE, INVALID_FILE]);
        assert_eq!(read(&ws, &ns, PRIMARY_FILE), "a@b.com\na@b.com\n");
        assert_eq!(read(&ws, &ns, INVALID_FILE), "bad\n");
    }

    #[tokio::test]
    async fn test_clean_leaves_previous_invalid_file_when_none_found() {
        let (_tmp, ws, ns) = seeded("Old\nx@y.com\n").await;
        clean(&ws, &ns).await.unwrap();
        assert_eq!(read(&ws, &ns, INVALID_FILE), "Old\n");

        let report = clean(&ws, &ns).await.unwrap();
        assert!(report.invalid.is_empty());
        assert_eq!(report.files, [PRIMARY_FILE]);
        assert_eq!(read(&ws, &ns, INVALID_FILE), "Old\n");
    }

    #[tokio::test]
    async fn test_frequency_is_read_only() {
        let (_tmp, ws, ns) = seeded("B@x.com\nb@x.com\nc@x.com\n").await;
        let report = frequency(&ws, &ns).await.unwrap();
        assert_eq!(
            report.entries,
            vec![("b@x.com".to_string(), 2), ("c@x.com".to_string(), 1)]
        );
        assert_eq!(report.total, 3);
        assert_eq!(read(&ws, &ns, PRIMARY_FILE), "B@x.com\nb@x.com\nc@x.com\n");
    }

    #[tokio::test]
    async fn test_dedupe_sort_writes_sorted_file() {
        let (_tmp, ws, ns) = seeded("A@B.com\nbad\na@b.com\n").await;
        let report = dedupe_sort(&ws, &ns).await.unwrap();
        assert_eq!(report.emails.as_slice(), ["a@b.com", "bad"]);
        assert_eq!(report.file, SORTED_FILE);
        assert_eq!(read(&ws, &ns, SORTED_FILE), "a@b.com\nbad\n");
    }

    #[tokio::test]
    async fn test_group_by_domain_writes_bucket_files() {
        let (_tmp, ws, ns) = seeded("x@a.com\ny@b.com\nnope\nz@a.com\n").await;
        let report = group_by_domain(&ws, &ns).await.unwrap();

        assert_eq!(report.file_names(), ["emails_a_com.txt", "emails_b_com.txt"]);
        assert_eq!(read(&ws, &ns, "emails_a_com.txt"), "x@a.com\nz@a.com\n");
        assert_eq!(read(&ws, &ns, "emails_b_com.txt"), "y@b.com\n");
    }

    #[tokio::test]
    async fn test_group_by_domain_skips_path_like_domain_literal() {
        let (_tmp, ws, ns) = seeded("x@a.com\nq@[a/b]\n").await;
        let report = group_by_domain(&ws, &ns).await.unwrap();
        assert_eq!(report.file_names(), ["emails_a_com.txt"]);
        assert_eq!(read(&ws, &ns, "emails_a_com.txt"), "x@a.com\n");
    }

    #[tokio::test]
    async fn test_add_email_appends_normalized() {
        let (_tmp, ws, ns) = seeded("a@b.com\n").await;
        let added = add_email(&ws, &ns, "  New@Example.com ").await.unwrap();
        assert_eq!(added, "new@example.com");
        assert_eq!(read(&ws, &ns, PRIMARY_FILE), "a@b.com\nnew@example.com\n");
    }

    #[tokio::test]
    async fn test_add_email_rejects_invalid() {
        let (_tmp, ws, ns) = seeded("a@b.com\n").await;
        let err = add_email(&ws, &ns, "not-an-email").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert_eq!(read(&ws, &ns, PRIMARY_FILE), "a@b.com\n");
    }

    #[tokio::test]
    async fn test_add_email_rejects_duplicate_case_insensitively() {
        let (_tmp, ws, ns) = seeded("Mixed@Case.com\n").await;
        add_email(&ws, &ns, "other@case.com").await.unwrap();

        let err = add_email(&ws, &ns, "mixed@case.COM").await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(ref a) if a == "mixed@case.com"));

        let err = add_email(&ws, &ns, "OTHER@case.com").await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        assert_eq!(
            store_lines(&ws, &ns),
            2,
            "duplicate additions must not grow the list"
        );
    }

    #[tokio::test]
    async fn test_add_email_creates_primary_file() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(tmp.path());
        let ns = Namespace::new("fresh").unwrap();
        add_email(&ws, &ns, "first@list.io").await.unwrap();
        assert_eq!(read(&ws, &ns, PRIMARY_FILE), "first@list.io\n");
    }

    fn store_lines(workspace: &Workspace, namespace: &Namespace) -> usize {
        read(workspace, namespace, PRIMARY_FILE).lines().count()
    }
}
