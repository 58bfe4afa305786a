//! HTML for the landing page and the four form pages.

use casechat_core::forms::{FormError, FormKind, FormView};

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; background: #f3f4f6; margin: 0; }
    header { background: #1e3a8a; padding: 0.75rem 1.5rem; }
    header a { color: #fff; text-decoration: none; font-weight: 600; margin-right: 1rem; }
    main { display: flex; flex-direction: column; align-items: center; padding: 1rem; }
    .cards { display: flex; flex-wrap: wrap; gap: 1.5rem; justify-content: center; }
    .card { width: 20rem; background: #fff; border-radius: 0.5rem; padding: 1.25rem; color: inherit; text-decoration: none; box-shadow: 0 1px 2px rgba(0,0,0,.1); }
    .card:hover { box-shadow: 0 4px 12px rgba(0,0,0,.15); }
    form, .panel { width: 100%; max-width: 56rem; background: #fff; padding: 1rem; border-radius: 0.5rem; box-sizing: border-box; }
    input { width: 100%; padding: 0.5rem; margin-bottom: 0.5rem; box-sizing: border-box; }
    button { width: 100%; padding: 0.5rem; background: #2563eb; color: #fff; border: 0; border-radius: 0.25rem; }
    button:disabled { opacity: 0.5; }
    pre, .response { background: #e5e7eb; padding: 0.5rem; white-space: pre-wrap; max-width: 56rem; width: 100%; box-sizing: border-box; }
    .notice { color: #b91c1c; }
"#;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn path(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Question => "/chat/ask",
        FormKind::Qna => "/chat/qna",
        FormKind::Retriever => "/chat/retriever",
        FormKind::Summarizer => "/chat/summarizer",
    }
}

pub fn heading(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Question => "Legal Question",
        FormKind::Qna => "Legal Question and Answers",
        FormKind::Retriever => "Retriever Chat",
        FormKind::Summarizer => "Legal Summary",
    }
}

fn file_prompt(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Summarizer => "Upload the Legal Document to summarize",
        _ => "Upload the Legal Document to process",
    }
}

fn base(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Legal Case Study Chat</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>
        <nav>
            <a href="/">Home</a>
            <a href="/chat/summarizer">Summarize</a>
            <a href="/chat/qna">QnA</a>
            <a href="/chat/retriever">Retrieve</a>
        </nav>
    </header>
    <main>
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#
    )
}

pub fn landing() -> String {
    let cards = [
        (
            "/chat/summarizer",
            "Summarize Cases",
            "Get concise summaries of lengthy legal documents with a single click.",
        ),
        (
            "/chat/qna",
            "Ask Questions",
            "Ask natural language questions and receive contextual answers from case files.",
        ),
        (
            "/chat/retriever",
            "Retrieve Similar Cases",
            "Find legal cases similar to your uploaded document using smart retrieval.",
        ),
    ];
    let cards: String = cards
        .iter()
        .map(|(href, title, blurb)| {
            format!(r#"<a class="card" href="{href}"><h3>{title}</h3><p>{blurb}</p></a>"#)
        })
        .collect();
    base("Legal Case Study Chat", &format!(r#"<div class="cards">{cards}</div>"#))
}

/// A form page rendered from the controller's current state. A fresh
/// controller gives the empty page.
pub fn form(view: &dyn FormView, question: &str, notice: Option<&FormError>) -> String {
    render(
        view.kind(),
        question,
        view.button_label(),
        !view.can_submit(),
        view.state().response(),
        notice,
    )
}

fn render(
    kind: FormKind,
    question: &str,
    label: &str,
    disabled: bool,
    response: &str,
    notice: Option<&FormError>,
) -> String {
    let mut fields = String::new();
    if kind.needs_document() {
        // The summarizer button stays disabled until a file is picked.
        let on_change = if kind == FormKind::Summarizer {
            r#" onchange="this.form.querySelector('button').disabled = !this.files.length""#
        } else {
            ""
        };
        fields.push_str(&format!(
            r#"<label for="document">{prompt}</label>
        <input id="document" type="file" name="document" accept=".txt" required{on_change}>
        "#,
            prompt = file_prompt(kind),
        ));
    }
    if kind.needs_question() {
        fields.push_str(&format!(
            r#"<input type="text" name="question" placeholder="Type your legal question..." value="{}" required>
        "#,
            html_escape(question)
        ));
    }

    let disabled = if disabled { " disabled" } else { "" };
    let notice = notice
        .map(|e| format!(r#"<p class="notice">{}</p>"#, html_escape(&e.to_string())))
        .unwrap_or_default();
    let response = if response.is_empty() {
        String::new()
    } else if kind == FormKind::Question {
        format!(
            r#"<p class="response">{}{}</p>"#,
            kind.display_prefix(),
            html_escape(response)
        )
    } else {
        format!("<pre>{}{}</pre>", kind.display_prefix(), html_escape(response))
    };

    let content = format!(
        r#"<form method="post" action="{action}" enctype="multipart/form-data">
        {fields}<button type="submit"{disabled}>{label}</button>
    </form>
    {notice}
    {response}"#,
        action = path(kind),
    );
    base(heading(kind), &content)
}
