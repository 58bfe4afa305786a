//! Form controllers driven through the real reqwest transport against a
//! throwaway axum server on an ephemeral port.

use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Json, Router};
use casechat_core::{
    document::DocumentText,
    forms::{FormPhase, FormView, QnaForm, QuestionForm, RetrieverForm, SummarizerForm},
    transport::{HttpTransport, JsonTransport},
    ERROR_FETCHING_RESPONSE, ERROR_FETCHING_SUMMARY,
};
use serde_json::{json, Value};

async fn spawn_stub() -> String {
    // Json<Value> extraction rejects requests without a JSON content type,
    // so every 200 below also proves the header was sent.
    let app = Router::new()
        .route(
            "/api/ask",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "answer": format!("AI Response for: \"{}\"", body["question"].as_str().unwrap_or("")) }))
            }),
        )
        .route(
            "/qna",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "response": { "query": body["query"], "chars": body["document_text"].as_str().map(str::len) } }))
            }),
        )
        .route(
            "/retrieve",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "response": format!("cases for {}", body["query"].as_str().unwrap_or("")) }))
            }),
        )
        .route(
            "/summarize",
            post(|Json(_body): Json<Value>| async move { Json(json!({ "summary": ["point one", "point two"] })) }),
        )
        .route(
            "/broken",
            post(|| async { (StatusCode::BAD_GATEWAY, Json(json!({ "detail": "upstream down" }))) }),
        )
        .route("/not-json", post(|| async { "plain text" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn transport() -> Arc<dyn JsonTransport> {
    Arc::new(HttpTransport::new())
}

#[tokio::test]
async fn transport_decodes_json_reply() {
    let base = spawn_stub().await;
    let reply = HttpTransport::new()
        .post_json(&format!("{base}/retrieve"), &json!({ "query": "fraud" }))
        .await
        .unwrap();
    assert_eq!(reply, json!({ "response": "cases for fraud" }));
}

#[tokio::test]
async fn transport_treats_non_2xx_as_error() {
    let base = spawn_stub().await;
    let res = HttpTransport::new()
        .post_json(&format!("{base}/broken"), &json!({}))
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn transport_treats_non_json_body_as_error() {
    let base = spawn_stub().await;
    let res = HttpTransport::new()
        .post_json(&format!("{base}/not-json"), &json!({}))
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn question_form_round_trip() {
    let base = spawn_stub().await;
    let mut form = QuestionForm::new(transport(), format!("{base}/api/ask"));
    form.set_question("What is negligence?");
    assert_eq!(
        form.submit().await.unwrap(),
        "AI Response for: \"What is negligence?\""
    );
}

#[tokio::test]
async fn qna_form_round_trip() {
    let base = spawn_stub().await;
    let mut form = QnaForm::new(transport(), format!("{base}/qna"));
    form.load_document(DocumentText::from_bytes("a.txt", b"0123456789").unwrap());
    form.set_question("How long?");
    assert_eq!(
        form.submit().await.unwrap(),
        "{\n  \"chars\": 10,\n  \"query\": \"How long?\"\n}"
    );
}

#[tokio::test]
async fn retriever_form_round_trip() {
    let base = spawn_stub().await;
    let mut form = RetrieverForm::new(transport(), format!("{base}/retrieve"));
    form.set_question("bail");
    assert_eq!(form.submit().await.unwrap(), "\"cases for bail\"");
}

#[tokio::test]
async fn summarizer_form_round_trip() {
    let base = spawn_stub().await;
    let mut form = SummarizerForm::new(transport(), format!("{base}/summarize"));
    form.load_document(DocumentText::from_bytes("j.txt", b"judgment").unwrap());
    assert_eq!(
        form.submit().await.unwrap(),
        "[\n  \"point one\",\n  \"point two\"\n]"
    );
}

#[tokio::test]
async fn non_2xx_backend_shows_fixed_error() {
    let base = spawn_stub().await;

    let mut retriever = RetrieverForm::new(transport(), format!("{base}/broken"));
    retriever.set_question("q");
    assert_eq!(retriever.submit().await.unwrap(), ERROR_FETCHING_RESPONSE);
    assert!(!retriever.state().is_loading());
    assert_eq!(retriever.state().phase(), FormPhase::Failure);

    let mut summarizer = SummarizerForm::new(transport(), format!("{base}/broken"));
    summarizer.load_document(DocumentText::from_bytes("j.txt", b"x").unwrap());
    assert_eq!(summarizer.submit().await.unwrap(), ERROR_FETCHING_SUMMARY);
    assert!(!summarizer.state().is_loading());
}

#[tokio::test]
async fn unreachable_backend_shows_fixed_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut form = QuestionForm::new(transport(), format!("http://{addr}/api/ask"));
    form.set_question("q");
    assert_eq!(form.submit().await.unwrap(), ERROR_FETCHING_RESPONSE);
}
