use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Sends a JSON body and returns the decoded JSON reply.
///
/// Implementations must treat a non-2xx status as an error.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// reqwest-backed transport. No timeout and no retries: a request that
/// never completes keeps its caller waiting.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("casechat/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::debug!(url, "POST");
        Ok(self
            .http
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}
