use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    config::{AskBackend, Config},
    transport::JsonTransport,
};

/// Produces the answer behind `POST /api/ask`.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String>;
}

/// Echoes the question back in a fixed template.
pub struct PlaceholderAnswerer;

#[async_trait]
impl Answerer for PlaceholderAnswerer {
    async fn answer(&self, question: &str) -> Result<String> {
        Ok(format!("AI Response for: \"{question}\""))
    }
}

/// Asks the retrieval service and answers with its `response` field.
pub struct RetrieverAnswerer {
    transport: Arc<dyn JsonTransport>,
    url: String,
}

impl RetrieverAnswerer {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Answerer for RetrieverAnswerer {
    async fn answer(&self, question: &str) -> Result<String> {
        let reply = self
            .transport
            .post_json(&self.url, &json!({ "query": question }))
            .await?;
        match reply.get("response") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(anyhow!("retrieval reply has no response field")),
            Some(other) => Ok(other.to_string()),
        }
    }
}

/// Pick the answerer named by `ASK_BACKEND`.
pub fn from_config(config: &Config, transport: Arc<dyn JsonTransport>) -> Arc<dyn Answerer> {
    match config.ask_backend {
        AskBackend::Placeholder => Arc::new(PlaceholderAnswerer),
        AskBackend::Retriever => Arc::new(RetrieverAnswerer::new(transport, &config.retrieve_url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        reply: Value,
        seen: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl JsonTransport for Canned {
        async fn post_json(&self, _url: &str, body: &Value) -> Result<Value> {
            self.seen.lock().unwrap().push(body.clone());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn placeholder_quotes_question() {
        let a = PlaceholderAnswerer.answer("What is negligence?").await.unwrap();
        assert_eq!(a, "AI Response for: \"What is negligence?\"");
    }

    #[tokio::test]
    async fn retriever_answerer_returns_response_text() {
        let t = Arc::new(Canned {
            reply: json!({ "response": "Case text" }),
            seen: Mutex::new(Vec::new()),
        });
        let a = RetrieverAnswerer::new(t.clone(), "http://r/retrieve");
        assert_eq!(a.answer("tax evasion").await.unwrap(), "Case text");
        assert_eq!(t.seen.lock().unwrap()[0], json!({ "query": "tax evasion" }));
    }

    #[tokio::test]
    async fn retriever_answerer_errors_without_response() {
        let t = Arc::new(Canned {
            reply: json!({ "detail": "nope" }),
            seen: Mutex::new(Vec::new()),
        });
        assert!(RetrieverAnswerer::new(t, "u").answer("q").await.is_err());
    }

    #[tokio::test]
    async fn from_config_selects_backend() {
        let t = Arc::new(Canned {
            reply: json!({ "response": "retrieved" }),
            seen: Mutex::new(Vec::new()),
        });
        let mut cfg = Config::default();
        let a = from_config(&cfg, t.clone());
        assert!(a.answer("q").await.unwrap().starts_with("AI Response for:"));

        cfg.ask_backend = AskBackend::Retriever;
        let a = from_config(&cfg, t);
        assert_eq!(a.answer("q").await.unwrap(), "retrieved");
    }
}
