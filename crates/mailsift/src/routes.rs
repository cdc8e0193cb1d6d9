//! HTTP routes.
//!
//! Every route accepts an optional `?dir=<namespace>` query parameter; each
//! request runs one operation against that namespace and renders the result.

use std::sync::Arc;

use axum::{
    Form, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use mailsift_core::service::{self, Upload};
use mailsift_core::{Error, INVALID_FILE, Namespace, PRIMARY_FILE, Workspace};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::view::{self, Flash, Page};

/// Multipart field carrying the uploaded list.
const UPLOAD_FIELD: &str = "emails_file";

/// Shared, immutable request state.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    workspace: Workspace,
    default_namespace: Namespace,
}

impl AppState {
    /// Creates the state for a workspace and fallback namespace.
    #[must_use]
    pub fn new(workspace: Workspace, default_namespace: Namespace) -> Self {
        Self {
            inner: Arc::new(Inner {
                workspace,
                default_namespace,
            }),
        }
    }

    fn workspace(&self) -> &Workspace {
        &self.inner.workspace
    }

    fn default_namespace(&self) -> &Namespace {
        &self.inner.default_namespace
    }
}

/// Namespace selection.
#[derive(Debug, Default, Deserialize)]
pub struct DirQuery {
    dir: Option<String>,
}

/// Add-address form.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    email: String,
}

/// Builds the application router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(Page::Current.path(), get(current))
        .route(Page::Clean.path(), get(clean))
        .route(Page::Frequency.path(), get(frequency))
        .route(Page::Sort.path(), get(dedupe_sort))
        .route(Page::Domains.path(), get(domains))
        .route(Page::Add.path(), get(add_form).post(add_submit))
        .route(Page::Upload.path(), get(upload_form).post(upload_submit))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn render(page: Page, namespace: &Namespace, flash: Option<&Flash>, body: &str) -> Html<String> {
    Html(view::view_page(page, namespace, flash, body))
}

/// Renders a failed operation, logging it by severity.
fn failure(page: Page, namespace: &Namespace, err: &Error, body: &str) -> Response {
    let status = if err.is_user_error() {
        warn!(namespace = %namespace, error = %err, "Request rejected");
        StatusCode::BAD_REQUEST
    } else {
        error!(namespace = %namespace, error = %err, "Operation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let flash = Flash::Error(err.to_string());
    (status, render(page, namespace, Some(&flash), body)).into_response()
}

/// Resolves the requested namespace, or renders the rejection.
fn resolve(state: &AppState, page: Page, query: &DirQuery) -> Result<Namespace, Response> {
    Namespace::from_param(query.dir.as_deref(), state.default_namespace())
        .map_err(|err| failure(page, state.default_namespace(), &err, ""))
}

async fn health() -> &'static str {
    "ok"
}

async fn current(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Current, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match service::current(state.workspace(), &ns).await {
        Ok(report) => render(Page::Current, &ns, None, &view::view_current(&report)).into_response(),
        Err(err) => failure(Page::Current, &ns, &err, ""),
    }
}

async fn clean(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Clean, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match service::clean(state.workspace(), &ns).await {
        Ok(report) => {
            let flash = Flash::Success(format!(
                "Cleaning done: {} invalid addresses removed (saved to '{INVALID_FILE}') and {} valid addresses kept in '{PRIMARY_FILE}'.",
                report.invalid.len(),
                report.valid.len(),
            ));
            render(Page::Clean, &ns, Some(&flash), &view::view_clean(&report)).into_response()
        }
        Err(err) => failure(Page::Clean, &ns, &err, ""),
    }
}

async fn frequency(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Frequency, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match service::frequency(state.workspace(), &ns).await {
        Ok(report) => {
            render(Page::Frequency, &ns, None, &view::view_frequency(&report)).into_response()
        }
        Err(err) => failure(Page::Frequency, &ns, &err, ""),
    }
}

async fn dedupe_sort(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Sort, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match service::dedupe_sort(state.workspace(), &ns).await {
        Ok(report) => {
            let flash = Flash::Success(format!(
                "Addresses deduplicated and sorted into '{}'. Number of addresses: {}.",
                report.file,
                report.emails.len(),
            ));
            render(Page::Sort, &ns, Some(&flash), &view::view_sort(&report)).into_response()
        }
        Err(err) => failure(Page::Sort, &ns, &err, ""),
    }
}

async fn domains(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Domains, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match service::group_by_domain(state.workspace(), &ns).await {
        Ok(report) => {
            let flash = Flash::Success(format!(
                "Addresses split by domain. Files created: {}.",
                report.file_names().join(", "),
            ));
            render(Page::Domains, &ns, Some(&flash), &view::view_domains(&report)).into_response()
        }
        Err(err) => failure(Page::Domains, &ns, &err, ""),
    }
}

/// Add form followed by the current list.
async fn add_body(state: &AppState, ns: &Namespace) -> Result<String, Error> {
    let report = service::current(state.workspace(), ns).await?;
    Ok(format!(
        "{}\n{}",
        view::view_add_form(ns),
        view::view_current(&report)
    ))
}

async fn add_form(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Add, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    match add_body(&state, &ns).await {
        Ok(body) => render(Page::Add, &ns, None, &body).into_response(),
        Err(err) => failure(Page::Add, &ns, &err, ""),
    }
}

async fn add_submit(
    State(state): State<AppState>,
    Query(query): Query<DirQuery>,
    Form(form): Form<AddForm>,
) -> Response {
    let ns = match resolve(&state, Page::Add, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    let outcome = service::add_email(state.workspace(), &ns, &form.email).await;
    let body = match add_body(&state, &ns).await {
        Ok(body) => body,
        Err(err) => return failure(Page::Add, &ns, &err, ""),
    };
    match outcome {
        Ok(address) => {
            let flash = Flash::Success(format!("Address {address} added."));
            render(Page::Add, &ns, Some(&flash), &body).into_response()
        }
        Err(err) => failure(Page::Add, &ns, &err, &body),
    }
}

async fn upload_form(State(state): State<AppState>, Query(query): Query<DirQuery>) -> Response {
    let ns = match resolve(&state, Page::Upload, &query) {
        Ok(ns) => ns,
        Err(resp) => return resp,
    };
    render(Page::Upload, &ns, None, &view::view_upload_form(&ns)).into_response()
}

/// Pulls the list file out of the multipart body.
///
/// A missing field or an empty file name means nothing was chosen; a body
/// read failure is passed on as a transfer error.
async fn read_upload(multipart: &mut Multipart) -> Option<Upload> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(err) => {
                return Some(Upload {
                    file_name: String::new(),
                    content: Bytes::new(),
                    transfer_error: Some(err.to_string()),
                });
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return None;
        }
        return Some(match field.bytes().await {
            Ok(content) => Upload::new(file_name, content),
            Err(err) => Upload {
                file_name,
                content: Bytes::new(),
                transfer_error: Some(err.to_string()),
            },
        });
    }
}

async fn upload_submit(
    State(state): State<AppState>,
    Query(query): Query<DirQuery>,
    mut multipart: Multipart,
) -> Response {
    // The query only names a fallback here; the file name decides first.
    let hint = Namespace::from_param(query.dir.as_deref(), state.default_namespace())
        .unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring namespace hint for upload");
            state.default_namespace().clone()
        });
    let upload = read_upload(&mut multipart).await;

    let outcome = match service::import_upload(state.workspace(), upload, Some(&hint)).await {
        Ok(outcome) => outcome,
        Err(err) => return failure(Page::Upload, &hint, &err, &view::view_upload_form(&hint)),
    };

    let ns = outcome.namespace;
    match service::current(state.workspace(), &ns).await {
        Ok(report) => {
            let flash = Flash::Success(format!(
                "File '{}' uploaded ({} lines). Processing it as {PRIMARY_FILE} in namespace '{ns}'.",
                outcome.stored_file, outcome.line_count,
            ));
            render(Page::Upload, &ns, Some(&flash), &view::view_current(&report)).into_response()
        }
        Err(err) => failure(Page::Upload, &ns, &err, ""),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    fn app(root: &std::path::Path) -> Router {
        router(
            AppState::new(Workspace::new(root), Namespace::default()),
            1024 * 1024,
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_upload(uri: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{UPLOAD_FIELD}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let response = app(tmp.path()).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_current_on_empty_namespace() {
        let tmp = tempfile::tempdir().unwrap();
        let response = app(tmp.path()).oneshot(get_request("/?dir=team")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No email addresses recorded."));
        assert!(tmp.path().join("team").is_dir());
    }

    #[tokio::test]
    async fn test_invalid_namespace_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let response = app(tmp.path()).oneshot(get_request("/clean?dir=..")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Invalid namespace"));
    }

    #[tokio::test]
    async fn test_add_then_duplicate() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app(tmp.path());

        let response = app
            .clone()
            .oneshot(post_form("/add", "email=New%40Example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Address new@example.com added."));

        let response = app
            .clone()
            .oneshot(post_form("/add", "email=new%40example.COM"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("already exists"));

        let response = app.oneshot(post_form("/add", "email=nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let primary = tmp.path().join("default").join(PRIMARY_FILE);
        assert_eq!(std::fs::read_to_string(primary).unwrap(), "new@example.com\n");
    }

    #[tokio::test]
    async fn test_upload_then_clean() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app(tmp.path());

        let response = app
            .clone()
            .oneshot(post_upload("/upload", "Contacts List!.txt", "A@B.com\nbad\na@b.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("namespace &#39;ContactsList&#39;"));
        assert!(html.contains("/clean?dir=ContactsList"));

        let response = app
            .oneshot(get_request("/clean?dir=ContactsList"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("1 invalid addresses removed"));
        assert!(html.contains("<pre>a@b.com\na@b.com\n</pre>"));
    }

    #[tokio::test]
    async fn test_upload_ignores_malformed_namespace_hint() {
        let tmp = tempfile::tempdir().unwrap();
        let response = app(tmp.path())
            .oneshot(post_upload("/upload?dir=..", "team.txt", "a@b.com\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<pre>a@b.com\n</pre>"));
        assert!(tmp.path().join("team").join(PRIMARY_FILE).is_file());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_txt() {
        let tmp = tempfile::tempdir().unwrap();
        let response = app(tmp.path())
            .oneshot(post_upload("/upload", "list.csv", "a@b.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("only .txt files are allowed"));
    }

    #[tokio::test]
    async fn test_domains_lists_created_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("default");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(PRIMARY_FILE), "x@a.com\ny@b.com\nz@a.com\n").unwrap();

        let response = app(tmp.path()).oneshot(get_request("/domains")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_text(response)
                .await
                .contains("Files created: emails_a_com.txt, emails_b_com.txt.")
        );
    }
}
