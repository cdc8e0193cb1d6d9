//! Operations exposed to the transport layer.
//!
//! This module ties the pure transformations in [`crate::classify`] to the
//! namespace stores and returns structured reports for rendering.

pub mod import;
pub mod list;

pub use import::{ALLOWED_EXTENSION, ImportOutcome, Upload, import_upload};
pub use list::{
    CleanReport, CurrentReport, DomainFile, DomainReport, FrequencyReport, SortReport, add_email,
    clean, current, dedupe_sort, frequency, group_by_domain,
};
