//! HTML rendering of operation results.
//!
//! Pages are assembled from plain `format!` templates. Everything that comes
//! from a list file or a request goes through [`html_escape`].

mod forms;
mod layout;
mod reports;

pub use forms::{view_add_form, view_upload_form};
pub use layout::view_page;
pub use reports::{view_clean, view_current, view_domains, view_frequency, view_sort};

/// Pages reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Current primary list.
    Current,
    /// Separate valid and invalid addresses.
    Clean,
    /// Address frequency table.
    Frequency,
    /// Deduplicate and sort.
    Sort,
    /// Split by domain.
    Domains,
    /// Add a single address.
    Add,
    /// Upload a list.
    Upload,
}

impl Page {
    /// Pages in navigation order.
    pub const ALL: [Self; 7] = [
        Self::Current,
        Self::Clean,
        Self::Frequency,
        Self::Sort,
        Self::Domains,
        Self::Add,
        Self::Upload,
    ];

    /// Route path of the page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Current => "/",
            Self::Clean => "/clean",
            Self::Frequency => "/frequency",
            Self::Sort => "/sort",
            Self::Domains => "/domains",
            Self::Add => "/add",
            Self::Upload => "/upload",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current list",
            Self::Clean => "1 - Clean list",
            Self::Frequency => "2 - Frequency",
            Self::Sort => "3 - Dedupe & sort",
            Self::Domains => "4 - Split by domain",
            Self::Add => "5 - Add address",
            Self::Upload => "6 - Upload file",
        }
    }

    /// Bootstrap button class for the navigation link.
    const fn button(self) -> &'static str {
        match self {
            Self::Current => "btn-outline-primary",
            Self::Clean => "btn-primary",
            Self::Frequency => "btn-secondary",
            Self::Sort => "btn-success",
            Self::Domains => "btn-info",
            Self::Add => "btn-warning",
            Self::Upload => "btn-dark",
        }
    }
}

/// Status banner shown above the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    /// Operation succeeded.
    Success(String),
    /// Operation was rejected or failed.
    Error(String),
}

impl Flash {
    const fn class(&self) -> &'static str {
        match self {
            Self::Success(_) => "alert-success",
            Self::Error(_) => "alert-danger",
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }
}

/// Simple HTML escape for user-generated content
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
