use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, Json},
};
use casechat_core::{
    document::DocumentText,
    forms::{FormError, QnaForm, QuestionForm, RetrieverForm, SummarizerForm},
    ErrorBody, QUESTION_REQUIRED, SERVER_ERROR,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{pages, AppState};

// ── Error helper ──────────────────────────────────────────────────────────

fn server_error(e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    tracing::error!("internal error: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!(ErrorBody::new(SERVER_ERROR))),
    )
}

// ── API ───────────────────────────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}

/// `POST /api/ask`: 400 on a missing or empty question, 500 on an
/// unreadable body or answerer failure, otherwise `{answer}`.
pub async fn ask(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, Json<Value>) {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(Value::Null) => return server_error("request body is null"),
        Ok(v) => v,
        Err(e) => return server_error(format!("bad request body: {e}")),
    };

    let question = match body.get("question") {
        Some(Value::String(q)) if !q.is_empty() => q.as_str(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!(ErrorBody::new(QUESTION_REQUIRED))),
            )
        }
    };

    match state.answerer.answer(question).await {
        Ok(answer) => (StatusCode::OK, Json(json!({ "answer": answer }))),
        Err(e) => server_error(e),
    }
}

// ── Pages ─────────────────────────────────────────────────────────────────

pub async fn landing() -> Html<String> {
    Html(pages::landing())
}

pub async fn question_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = QuestionForm::new(Arc::clone(&state.transport), &state.config.ask_url);
    Html(pages::form(&form, "", None))
}

pub async fn qna_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = QnaForm::new(Arc::clone(&state.transport), &state.config.qna_url);
    Html(pages::form(&form, "", None))
}

pub async fn retriever_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = RetrieverForm::new(Arc::clone(&state.transport), &state.config.retrieve_url);
    Html(pages::form(&form, "", None))
}

pub async fn summarizer_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = SummarizerForm::new(Arc::clone(&state.transport), &state.config.summarize_url);
    Html(pages::form(&form, "", None))
}

// ── Form submissions ──────────────────────────────────────────────────────

/// Fields posted by a form page. `document` is `None` when no file was chosen.
#[derive(Default)]
pub(crate) struct FormInput {
    pub question: String,
    pub document: Option<Result<DocumentText, FormError>>,
}

impl FormInput {
    async fn read(mut multipart: Multipart) -> Result<Self, StatusCode> {
        let mut input = FormInput::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("unreadable form submission: {e}");
            StatusCode::BAD_REQUEST
        })? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("question") => {
                    input.question = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                }
                Some("document") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                    // Browsers send an empty, unnamed part when no file is picked.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let document = DocumentText::from_bytes(&file_name, &bytes);
                    if let Ok(doc) = &document {
                        tracing::debug!(
                            file = doc.name(),
                            chars = doc.text().len(),
                            "document uploaded"
                        );
                    }
                    input.document = Some(document);
                }
                _ => {}
            }
        }
        Ok(input)
    }

    /// Hand a successfully read document to `load`; surface a rejected one.
    fn attach(
        document: Option<Result<DocumentText, FormError>>,
        load: impl FnOnce(DocumentText),
    ) -> Result<(), FormError> {
        match document {
            Some(Ok(doc)) => {
                load(doc);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }
}

pub async fn submit_question(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let input = FormInput::read(multipart).await?;
    let mut form = QuestionForm::new(Arc::clone(&state.transport), &state.config.ask_url);
    form.set_question(&input.question);
    let notice = form.submit().await.err();
    Ok(Html(pages::form(&form, &input.question, notice.as_ref())))
}

pub async fn submit_qna(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let input = FormInput::read(multipart).await?;
    let mut form = QnaForm::new(Arc::clone(&state.transport), &state.config.qna_url);
    form.set_question(&input.question);
    let notice = match FormInput::attach(input.document, |d| form.load_document(d)) {
        Ok(()) => form.submit().await.err(),
        Err(e) => Some(e),
    };
    Ok(Html(pages::form(&form, &input.question, notice.as_ref())))
}

pub async fn submit_retriever(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let input = FormInput::read(multipart).await?;
    let mut form = RetrieverForm::new(Arc::clone(&state.transport), &state.config.retrieve_url);
    form.set_question(&input.question);
    let notice = form.submit().await.err();
    Ok(Html(pages::form(&form, &input.question, notice.as_ref())))
}

pub async fn submit_summarizer(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let input = FormInput::read(multipart).await?;
    let mut form = SummarizerForm::new(Arc::clone(&state.transport), &state.config.summarize_url);
    let notice = match FormInput::attach(input.document, |d| form.load_document(d)) {
        Ok(()) => form.submit().await.err(),
        Err(e) => Some(e),
    };
    Ok(Html(pages::form(&form, "", notice.as_ref())))
}
