//! Input forms.

use mailsift_core::Namespace;

use super::layout::page_href;
use super::{Page, html_escape};

/// Form for adding a single address.
#[must_use]
pub fn view_add_form(namespace: &Namespace) -> String {
    format!(
        r#"<h3 class="text-center">Add an email address</h3>
<form method="post" action="{action}" class="mx-auto" style="max-width: 400px;">
    <div class="mb-3">
        <label for="email" class="form-label">Email address:</label>
        <input type="email" class="form-control" id="email" name="email" required>
    </div>
    <button type="submit" class="btn btn-warning w-100">Add</button>
</form>"#,
        action = html_escape(&page_href(Page::Add, namespace)),
    )
}

/// Multipart form for uploading a `.txt` list.
#[must_use]
pub fn view_upload_form(namespace: &Namespace) -> String {
    format!(
        r#"<h3 class="text-center">Upload an email list</h3>
<form action="{action}" method="post" enctype="multipart/form-data" class="mx-auto" style="max-width: 400px;">
    <div class="mb-3">
        <label for="emails_file" class="form-label">Select a .txt file:</label>
        <input type="file" name="emails_file" id="emails_file" class="form-control" accept=".txt" required>
    </div>
    <button type="submit" class="btn btn-primary w-100">Upload file</button>
</form>"#,
        action = html_escape(&page_href(Page::Upload, namespace)),
    )
}
