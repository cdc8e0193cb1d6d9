//! Report bodies for each operation.

use std::fmt::Write;

use mailsift_core::{
    CleanReport, CurrentReport, DomainReport, EmailList, FrequencyReport, INVALID_FILE,
    PRIMARY_FILE, SortReport,
};

use super::html_escape;

/// A titled `<pre>` block holding a file's content.
#[must_use]
pub fn view_file(title: &str, list: &EmailList) -> String {
    format!(
        "<h4>Content of {}:</h4>\n<pre>{}</pre>\n",
        html_escape(title),
        html_escape(&list.to_content())
    )
}

/// Current primary list.
#[must_use]
pub fn view_current(report: &CurrentReport) -> String {
    match &report.raw {
        Some(raw) => format!(
            "<h4>Content of {PRIMARY_FILE}:</h4>\n<pre>{}</pre>\n",
            html_escape(raw)
        ),
        None => {
            format!("<h4>Content of {PRIMARY_FILE}:</h4>\n<pre>No email addresses recorded.</pre>\n")
        }
    }
}

/// Valid list and, when present, the invalid addresses.
#[must_use]
pub fn view_clean(report: &CleanReport) -> String {
    let mut html = view_file(&format!("{PRIMARY_FILE} (valid)"), &report.valid);
    if !report.invalid.is_empty() {
        html.push_str(&view_file(&format!("{INVALID_FILE} (invalid)"), &report.invalid));
    }
    html
}

/// Frequency table.
#[must_use]
pub fn view_frequency(report: &FrequencyReport) -> String {
    let mut rows = String::new();
    for (email, count) in &report.entries {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{count}</td></tr>",
            html_escape(email)
        );
    }

    format!(
        r#"<h3>Email addresses and their frequency</h3>
<table class="table table-bordered">
    <thead><tr><th>Email</th><th>Frequency</th></tr></thead>
    <tbody>{rows}</tbody>
</table>
"#
    )
}

/// Sorted output file.
#[must_use]
pub fn view_sort(report: &SortReport) -> String {
    view_file(&report.file, &report.emails)
}

/// One block per domain file.
#[must_use]
pub fn view_domains(report: &DomainReport) -> String {
    report
        .files
        .iter()
        .map(|file| view_file(&file.file_name, &file.emails))
        .collect()
}
