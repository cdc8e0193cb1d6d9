//! Page shell: head, navigation and status banner.

use std::fmt::Write;

use mailsift_core::Namespace;

use super::{Flash, Page, html_escape};

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";

/// Link to `page` keeping the namespace selection.
pub(super) fn page_href(page: Page, namespace: &Namespace) -> String {
    format!("{}?dir={}", page.path(), urlencoding::encode(namespace.as_str()))
}

fn view_nav(active: Page, namespace: &Namespace) -> String {
    let mut nav = String::from(r#"<nav class="my-4 text-center">"#);
    for page in Page::ALL {
        let current = if page == active { r#" aria-current="page""# } else { "" };
        let _ = write!(
            nav,
            r#"<a href="{href}" class="btn {class} mx-1 my-1"{current}>{label}</a>"#,
            href = html_escape(&page_href(page, namespace)),
            class = page.button(),
            label = page.label(),
        );
    }
    nav.push_str("</nav>");
    nav
}

/// Renders a complete HTML document around `body`.
#[must_use]
pub fn view_page(active: Page, namespace: &Namespace, flash: Option<&Flash>, body: &str) -> String {
    let banner = flash.map_or_else(String::new, |flash| {
        format!(
            r#"<div class="alert {} text-center" role="alert">{}</div>"#,
            flash.class(),
            html_escape(flash.text())
        )
    });

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Email lists</title>
    <link href="{css}" rel="stylesheet">
</head>
<body class="container py-5">
    <h1 class="text-center">Email lists</h1>
    <p class="text-center text-muted">Namespace: <code>{namespace}</code></p>
    {nav}
    {banner}
    <div class="mt-4">
{body}
    </div>
</body>
</html>
"#,
        css = BOOTSTRAP_CSS,
        namespace = html_escape(namespace.as_str()),
        nav = view_nav(active, namespace),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_links_carry_namespace() {
        let ns = Namespace::new("team-a").unwrap();
        let html = view_page(Page::Sort, &ns, None, "<p>body</p>");
        assert!(html.contains(r#"href="/clean?dir=team-a""#));
        assert!(html.contains(r#"href="/upload?dir=team-a""#));
        assert!(html.contains("<p>body</p>"));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_page_href_encodes_namespace() {
        let ns = Namespace::new("team-a_1.x").unwrap();
        assert_eq!(page_href(Page::Domains, &ns), "/domains?dir=team-a_1.x");
        assert_eq!(page_href(Page::Current, &Namespace::default()), "/?dir=default");
    }

    #[test]
    fn test_flash_is_escaped() {
        let flash = Flash::Error("<script>x</script>".into());
        let html = view_page(Page::Add, &Namespace::default(), Some(&flash), "");
        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }
}
