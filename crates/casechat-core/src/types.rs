use serde::{Deserialize, Serialize};

// ── Request bodies ───────────────────────────────────────────────────────

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Body sent to the QnA service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QnaRequest {
    pub query: String,
    pub document_text: String,
}

/// Body sent to the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
}

/// Body sent to the summarization service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub document_text: String,
}

// ── Response bodies ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ── Fixed strings ────────────────────────────────────────────────────────

pub const QUESTION_REQUIRED: &str = "Question is required";
pub const SERVER_ERROR: &str = "Server error";
pub const NO_RESPONSE: &str = "No response";
pub const ERROR_FETCHING_RESPONSE: &str = "Error fetching response";
pub const ERROR_FETCHING_SUMMARY: &str = "Error fetching summary";
