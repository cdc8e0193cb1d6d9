//! # mailsift-core
//!
//! Email list pipeline for `mailsift`.
//!
//! This crate provides:
//! - **Validation** - syntactic address checks and normalization
//! - **Namespaces** - sanitized storage partitions under an uploads root
//! - **Store** - newline-delimited list files with atomic overwrite
//! - **Classification** - partition, frequency, dedupe+sort, group-by-domain
//! - **Services** - load-transform-save operations returning reports
//! - **Import** - seeding a namespace from an uploaded `.txt` file
//!
//! ## Example
//!
//! ```ignore
//! use mailsift_core::{Namespace, Workspace, service};
//!
//! let workspace = Workspace::new("uploads");
//! let namespace = Namespace::default();
//!
//! service::add_email(&workspace, &namespace, "Someone@Example.com").await?;
//! let report = service::clean(&workspace, &namespace).await?;
//! println!("{} valid, {} invalid", report.valid.len(), report.invalid.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classify;
mod error;
pub mod namespace;
pub mod service;
pub mod store;
pub mod validation;

pub use classify::{DomainBucket, Partition, domain_file_name};
pub use error::{Error, Result};
pub use namespace::{DEFAULT_NAMESPACE, Namespace, Workspace, sanitize};
pub use service::{
    CleanReport, CurrentReport, DomainFile, DomainReport, FrequencyReport, ImportOutcome,
    SortReport, Upload,
};
pub use store::{EmailList, INVALID_FILE, PRIMARY_FILE, SORTED_FILE, Store};
pub use validation::{is_valid_email, normalize};
