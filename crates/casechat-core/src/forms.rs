use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    document::DocumentText,
    transport::JsonTransport,
    types::{ERROR_FETCHING_RESPONSE, ERROR_FETCHING_SUMMARY, NO_RESPONSE},
};

/// Reasons a submission is refused before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("only .txt documents are supported (got {0:?})")]
    UnsupportedFile(String),
    #[error("a request is already in flight")]
    Busy,
}

// ── Form kinds ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Question,
    Qna,
    Retriever,
    Summarizer,
}

impl FormKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Qna => "qna",
            Self::Retriever => "retriever",
            Self::Summarizer => "summarizer",
        }
    }

    pub fn idle_label(self) -> &'static str {
        match self {
            Self::Summarizer => "Summarize",
            _ => "Ask",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Summarizer => "Summarizing...",
            _ => "Thinking...",
        }
    }

    /// Shown in place of a result when the backend call fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Summarizer => ERROR_FETCHING_SUMMARY,
            _ => ERROR_FETCHING_RESPONSE,
        }
    }

    /// Field of the backend reply that holds the result.
    pub fn response_field(self) -> &'static str {
        match self {
            Self::Question => "answer",
            Self::Qna | Self::Retriever => "response",
            Self::Summarizer => "summary",
        }
    }

    pub fn display_prefix(self) -> &'static str {
        match self {
            Self::Summarizer => "Summary: ",
            _ => "Response: ",
        }
    }

    pub fn needs_question(self) -> bool {
        !matches!(self, Self::Summarizer)
    }

    pub fn needs_document(self) -> bool {
        matches!(self, Self::Qna | Self::Summarizer)
    }

    /// Turn a successful reply into the display string.
    pub fn render(self, reply: &Value) -> String {
        match self {
            Self::Question => answer_text(reply),
            _ => pretty_field(reply, self.response_field()),
        }
    }
}

/// `answer`, or "No response" when it is missing or falsy.
fn answer_text(reply: &Value) -> String {
    match reply.get("answer") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => NO_RESPONSE.to_string(),
        Some(Value::String(s)) if s.is_empty() => NO_RESPONSE.to_string(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => NO_RESPONSE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Pretty-print `reply[field]` with two-space indent; empty when absent.
fn pretty_field(reply: &Value, field: &str) -> String {
    reply
        .get(field)
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_default()
}

// ── Shared state machine ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

/// Display string and busy flag owned by one form instance.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    phase: FormPhase,
    response: String,
}

impl FormState {
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Last display string; empty means nothing to show.
    pub fn response(&self) -> &str {
        &self.response
    }

    fn begin(&mut self) -> Result<(), FormError> {
        if self.is_loading() {
            return Err(FormError::Busy);
        }
        self.phase = FormPhase::Submitting;
        self.response.clear();
        Ok(())
    }

    fn finish(&mut self, phase: FormPhase, response: String) {
        self.phase = phase;
        self.response = response;
    }
}

/// Read-only view shared by every form, used for rendering.
pub trait FormView {
    fn kind(&self) -> FormKind;
    fn state(&self) -> &FormState;
    fn can_submit(&self) -> bool;

    fn button_label(&self) -> &'static str {
        if self.state().is_loading() {
            self.kind().busy_label()
        } else {
            self.kind().idle_label()
        }
    }
}

/// One POST through the state machine. Failures never escape: they become
/// the kind's fixed failure message and are logged.
async fn exchange<'a>(
    state: &'a mut FormState,
    kind: FormKind,
    transport: &dyn JsonTransport,
    url: &str,
    body: Value,
) -> Result<&'a str, FormError> {
    state.begin()?;
    match transport.post_json(url, &body).await {
        Ok(reply) => {
            tracing::info!(form = kind.name(), url, "backend request succeeded");
            state.finish(FormPhase::Success, kind.render(&reply));
        }
        Err(e) => {
            tracing::warn!(form = kind.name(), url, "backend request failed: {e:#}");
            state.finish(FormPhase::Failure, kind.failure_message().to_string());
        }
    }
    Ok(state.response())
}

fn require_question(question: &str) -> Result<(), FormError> {
    if question.is_empty() {
        return Err(FormError::MissingField("question"));
    }
    Ok(())
}

fn require_document(document: &Option<DocumentText>) -> Result<&DocumentText, FormError> {
    match document {
        Some(doc) if !doc.text().is_empty() => Ok(doc),
        _ => Err(FormError::MissingField("document")),
    }
}

// ── Question form ────────────────────────────────────────────────────────

/// Posts `{question}` to the local `/api/ask` route.
pub struct QuestionForm {
    transport: Arc<dyn JsonTransport>,
    url: String,
    question: String,
    state: FormState,
}

impl QuestionForm {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            question: String::new(),
            state: FormState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub async fn submit(&mut self) -> Result<&str, FormError> {
        require_question(&self.question)?;
        let body = json!({ "question": self.question });
        exchange(&mut self.state, FormKind::Question, self.transport.as_ref(), &self.url, body).await
    }
}

impl FormView for QuestionForm {
    fn kind(&self) -> FormKind {
        FormKind::Question
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }
}

// ── QnA form ─────────────────────────────────────────────────────────────

/// Posts `{query, document_text}` to the QnA service.
pub struct QnaForm {
    transport: Arc<dyn JsonTransport>,
    url: String,
    question: String,
    document: Option<DocumentText>,
    state: FormState,
}

impl QnaForm {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            question: String::new(),
            document: None,
            state: FormState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Replaces any previously loaded document.
    pub fn load_document(&mut self, document: DocumentText) {
        self.document = Some(document);
    }

    pub async fn submit(&mut self) -> Result<&str, FormError> {
        let document = require_document(&self.document)?;
        require_question(&self.question)?;
        let body = json!({
            "query": self.question,
            "document_text": document.text(),
        });
        exchange(&mut self.state, FormKind::Qna, self.transport.as_ref(), &self.url, body).await
    }
}

impl FormView for QnaForm {
    fn kind(&self) -> FormKind {
        FormKind::Qna
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }
}

// ── Retriever form ───────────────────────────────────────────────────────

/// Posts `{query}` to the case retrieval service.
pub struct RetrieverForm {
    transport: Arc<dyn JsonTransport>,
    url: String,
    question: String,
    state: FormState,
}

impl RetrieverForm {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            question: String::new(),
            state: FormState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub async fn submit(&mut self) -> Result<&str, FormError> {
        require_question(&self.question)?;
        let body = json!({ "query": self.question });
        exchange(&mut self.state, FormKind::Retriever, self.transport.as_ref(), &self.url, body).await
    }
}

impl FormView for RetrieverForm {
    fn kind(&self) -> FormKind {
        FormKind::Retriever
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }
}

// ── Summarizer form ──────────────────────────────────────────────────────

/// Posts `{document_text}` to the summarization service.
pub struct SummarizerForm {
    transport: Arc<dyn JsonTransport>,
    url: String,
    document: Option<DocumentText>,
    state: FormState,
}

impl SummarizerForm {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            document: None,
            state: FormState::default(),
        }
    }

    pub fn load_document(&mut self, document: DocumentText) {
        self.document = Some(document);
    }

    pub async fn submit(&mut self) -> Result<&str, FormError> {
        let document = require_document(&self.document)?;
        let body = json!({ "document_text": document.text() });
        exchange(&mut self.state, FormKind::Summarizer, self.transport.as_ref(), &self.url, body).await
    }
}

impl FormView for SummarizerForm {
    fn kind(&self) -> FormKind {
        FormKind::Summarizer
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    // Disabled until a non-empty document is loaded.
    fn can_submit(&self) -> bool {
        !self.state.is_loading() && require_document(&self.document).is_ok()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
