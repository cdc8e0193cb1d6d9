//! Pure list transformations: partition, frequency, dedupe+sort and
//! group-by-domain.
//!
//! None of these touch the filesystem; [`crate::service`] wires them to the
//! store.

use std::collections::{BTreeSet, HashMap};

use crate::store::EmailList;
use crate::validation::{domain_of, is_valid_email, normalize};

/// Valid and invalid records of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Valid records, lower-cased.
    pub valid: EmailList,
    /// Invalid records, original casing.
    pub invalid: EmailList,
}

/// A group of valid addresses sharing a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainBucket {
    /// Lower-cased domain (substring after the final `@`).
    pub domain: String,
    /// Members in input order.
    pub emails: EmailList,
}

impl DomainBucket {
    /// File name this bucket is persisted under.
    #[must_use]
    pub fn file_name(&self) -> String {
        domain_file_name(&self.domain)
    }
}

/// `emails_<domain with dots replaced by underscores>.txt`.
///
/// Path separators are replaced too, so the name never leaves the namespace
/// directory.
#[must_use]
pub fn domain_file_name(domain: &str) -> String {
    format!("emails_{}.txt", domain.replace(['.', '/', '\\'], "_"))
}

/// Splits `list` into valid (lower-cased) and invalid (as-is) records,
/// keeping relative order within each side.
#[must_use]
pub fn partition(list: &EmailList) -> Partition {
    let mut out = Partition::default();
    for email in list {
        let lower = normalize(email);
        if is_valid_email(&lower) {
            out.valid.push(lower);
        } else {
            out.invalid.push(email.clone());
        }
    }
    out
}

/// Occurrence count of every normalized address, in first-occurrence order.
#[must_use]
pub fn frequency(list: &EmailList) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for email in list {
        let key = normalize(email);
        if let Some(&i) = index.get(&key) {
            counts[i].1 += 1;
        } else {
            index.insert(key.clone(), counts.len());
            counts.push((key, 1));
        }
    }
    counts
}

/// Lower-cases, removes duplicates and sorts ascending by byte order.
///
/// Invalid entries are kept; only `partition` and `group_by_domain` filter
/// on validity.
#[must_use]
pub fn dedupe_sort(list: &EmailList) -> EmailList {
    list.iter()
        .map(|email| normalize(email))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Groups valid, lower-cased addresses by domain.
///
/// Buckets appear in first-seen order; members keep input order.
#[must_use]
pub fn group_by_domain(list: &EmailList) -> Vec<DomainBucket> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<DomainBucket> = Vec::new();

    for email in list {
        let email = normalize(email);
        if !is_valid_email(&email) {
            continue;
        }
        let Some(domain) = domain_of(&email).map(str::to_string) else {
            continue;
        };

        let i = *index.entry(domain.clone()).or_insert_with(|| {
            buckets.push(DomainBucket {
                domain,
                emails: EmailList::new(),
            });
            buckets.len() - 1
        });
        buckets[i].emails.push(email);
    }
    buckets
}
