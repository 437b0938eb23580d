use std::borrow::Cow;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

mod client;
mod export;
mod record;
mod state;

pub use client::{UPLOAD_FIELD, VerificationClient, VerifyError};
pub use export::export_results;
pub use record::{DisplayRow, VerificationResult};
pub use state::{SelectedFile, SubmitStart, ViewSnapshot, ViewState};

use crate::{
    AppState,
    web::{
        ApiMessage, downloads::attachment, escape_html, json_error, render_footer,
        resolve_session,
        templates::{PageLayout, render_page},
        uploads::read_single_file,
    },
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const PAGE_TITLE: &str = "Glad Connect License Verification";
const SUBMIT_LABEL: &str = "Upload & Verify";
const SUBMIT_BUSY_LABEL: &str = "Verifying...";

const PAGE_SCRIPT: &str = r#"<script>
    const picker = document.getElementById('file');
    const selectForm = document.getElementById('select-form');
    const verifyForm = document.getElementById('verify-form');
    if (picker && selectForm) {
        picker.addEventListener('change', () => selectForm.submit());
    }
    if (verifyForm) {
        verifyForm.addEventListener('submit', () => {
            const button = verifyForm.querySelector('button');
            button.disabled = true;
            button.textContent = 'Verifying...';
        });
    }
</script>"#;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(verification_page))
        .route("/select", post(select_file))
        .route("/verify", post(submit))
        .route("/export", get(export_download))
        .route("/api/state", get(view_state))
}

async fn verification_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (jar, session) = resolve_session(jar, state.config().session_ttl);
    let body = state
        .sessions()
        .with_view(session, |view| render_form_body(view))
        .await;

    let html = render_page(PageLayout {
        meta_title: PAGE_TITLE,
        page_heading: PAGE_TITLE,
        body_html: Cow::Owned(body),
        footer_html: Cow::Owned(render_footer()),
        extra_style_blocks: Vec::new(),
        body_scripts: vec![Cow::Borrowed(PAGE_SCRIPT)],
    });

    (jar, Html(html))
}

async fn select_file(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Redirect) {
    let (jar, session) = resolve_session(jar, state.config().session_ttl);

    let upload = match read_single_file(multipart, UPLOAD_FIELD).await {
        Ok(upload) => upload,
        Err(err) => {
            warn!(%session, error = err.message(), "failed to read selected file");
            None
        }
    };
    let selection = upload.map(|file| SelectedFile::new(file.original_name, file.bytes));
    let file_name = selection
        .as_ref()
        .map(|file| file.file_name.clone())
        .unwrap_or_default();

    let accepted = state
        .sessions()
        .with_view(session, |view| {
            view.select_file(selection);
            view.error_message().is_none()
        })
        .await;

    if accepted {
        debug!(%session, file = %file_name, "file selected");
    } else {
        debug!(%session, file = %file_name, "file selection rejected");
    }

    (jar, Redirect::to("/"))
}

async fn submit(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, session) = resolve_session(jar, state.config().session_ttl);

    match state
        .sessions()
        .with_view(session, ViewState::begin_submit)
        .await
    {
        SubmitStart::Send(file) => {
            // Run detached so the loading flag is cleared even if the browser
            // goes away mid-request.
            let task = tokio::spawn(run_verification(state.clone(), session, file));
            if let Err(err) = task.await {
                error!(?err, %session, "verification task aborted");
                state
                    .sessions()
                    .with_view(session, |view| {
                        view.finish_submit(Err(VerifyError::Transport(err.to_string())))
                    })
                    .await;
            }
        }
        SubmitStart::MissingFile => debug!(%session, "submit without a selected file"),
        SubmitStart::Busy => debug!(%session, "submit ignored while verification is in flight"),
    }

    (jar, Redirect::to("/"))
}

async fn run_verification(state: AppState, session: Uuid, file: SelectedFile) {
    let outcome = state.verifier().verify(&file).await;

    match &outcome {
        Ok(results) => info!(
            %session,
            file = %file.file_name,
            results = results.len(),
            "licence verification completed"
        ),
        Err(err) => warn!(%session, file = %file.file_name, %err, "licence verification failed"),
    }

    state
        .sessions()
        .with_view(session, |view| view.finish_submit(outcome))
        .await;
}

async fn export_download(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, (StatusCode, Json<ApiMessage>)> {
    let (jar, session) = resolve_session(jar, state.config().session_ttl);
    let results = state
        .sessions()
        .with_view(session, |view| view.results().to_vec())
        .await;

    let exported = export_results(&results, Utc::now().date_naive()).map_err(|err| {
        error!(?err, %session, "failed to build results workbook");
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate the export file.",
        )
    })?;

    let Some(workbook) = exported else {
        return Ok((jar, Redirect::to("/")).into_response());
    };

    info!(%session, rows = results.len(), file = %workbook.file_name, "results exported");
    let download = attachment(workbook.bytes, &workbook.file_name, XLSX_CONTENT_TYPE)?;

    Ok((jar, download).into_response())
}

async fn view_state(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ViewSnapshot>) {
    let (jar, session) = resolve_session(jar, state.config().session_ttl);
    let snapshot = state.sessions().snapshot(session).await;
    (jar, Json(snapshot))
}

fn render_form_body(view: &ViewState) -> String {
    let disabled = if view.actions_enabled() { "" } else { " disabled" };
    let submit_label = escape_html(if view.is_loading() {
        SUBMIT_BUSY_LABEL
    } else {
        SUBMIT_LABEL
    });

    let selected_html = view
        .selected_file()
        .map(|file| {
            format!(
                r#"<p class="selected">Selected file: <strong>{}</strong></p>"#,
                escape_html(&file.file_name)
            )
        })
        .unwrap_or_default();

    let error_html = view
        .error_message()
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();

    let results_html = if view.results().is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="results">
            <h3>Verification Results ({count})</h3>
            <table>
                <thead>
                    <tr><th>Licence Number</th><th>Licensee</th><th>Status</th><th>Expires</th></tr>
                </thead>
                <tbody>
{rows}
                </tbody>
            </table>
        </div>
        <form class="export" method="get" action="/export">
            <button type="submit"{disabled}>Export ⬆️</button>
        </form>"#,
            count = view.results().len(),
            rows = render_result_rows(view.results()),
        )
    };

    format!(
        r#"        <form id="select-form" class="picker" method="post" action="/select" enctype="multipart/form-data">
            <input id="file" type="file" name="{field}" accept=".xlsx">
            <noscript><button type="submit">Choose file</button></noscript>
        </form>
        {selected_html}
        <form id="verify-form" method="post" action="/verify">
            <button type="submit"{disabled}>{submit_label}</button>
        </form>
        {error_html}
        {results_html}"#,
        field = UPLOAD_FIELD,
    )
}

fn render_result_rows(results: &[VerificationResult]) -> String {
    results
        .iter()
        .map(|result| {
            let DisplayRow {
                licence_number,
                licensee,
                status,
                expires,
            } = result.display_row();
            format!(
                "                    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&licence_number),
                escape_html(&licensee),
                escape_html(&status),
                escape_html(&expires),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
