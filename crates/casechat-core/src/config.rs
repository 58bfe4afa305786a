use std::collections::HashMap;
use std::net::IpAddr;

use anyhow::{bail, Result};

const DEFAULT_BACKEND_BASE: &str = "https://rl-backend-legal-summarizer.onrender.com";

/// Which implementation answers `POST /api/ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskBackend {
    /// Returns the fixed `AI Response for: "<question>"` string.
    Placeholder,
    /// Forwards the question to the retrieval service.
    Retriever,
}

impl AskBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" | "" => Some(Self::Placeholder),
            "retriever" | "retrieve" => Some(Self::Retriever),
            _ => None,
        }
    }
}

/// Full application configuration, from env first and `.env` second.
#[derive(Debug, Clone)]
pub struct Config {
    // Web front-end
    pub web_bind: String,
    pub web_port: u16,
    /// Only this origin is allowed cross-origin when set; permissive otherwise.
    pub cors_origin: Option<String>,

    // Backend endpoints
    pub ask_url: String,
    pub qna_url: String,
    pub retrieve_url: String,
    pub summarize_url: String,

    pub ask_backend: AskBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_bind: "127.0.0.1".into(),
            web_port: 3000,
            cors_origin: None,
            ask_url: "http://127.0.0.1:3000/api/ask".into(),
            qna_url: "http://localhost:8000/qna".into(),
            retrieve_url: format!("{DEFAULT_BACKEND_BASE}/retrieve"),
            summarize_url: format!("{DEFAULT_BACKEND_BASE}/summarize"),
            ask_backend: AskBackend::Placeholder,
        }
    }
}

fn parse_dotenv_str(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim().trim_matches('"');
            map.insert(k.trim().to_string(), v.to_string());
        }
    }
    map
}

/// Host for reaching our own listener. A wildcard bind is not dialable,
/// so it becomes loopback; bare IPv6 literals get brackets.
fn ask_host(web_bind: &str) -> String {
    let bare = web_bind.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() => "127.0.0.1".into(),
        Ok(IpAddr::V6(ip)) => format!("[{ip}]"),
        _ => web_bind.to_string(),
    }
}

fn parse_dotenv() -> HashMap<String, String> {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return HashMap::new();
    };
    parse_dotenv_str(&contents)
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| dotenv.get(key).cloned())
        .filter(|v| !v.is_empty())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_sources(&parse_dotenv())
    }

    /// Build a config from process env layered over the given `.env` map.
    pub fn from_sources(dotenv: &HashMap<String, String>) -> Result<Self> {
        let defaults = Config::default();

        let web_bind = get_str("WEB_BIND", dotenv, &defaults.web_bind);
        let web_port = get_u16("WEB_PORT", dotenv, defaults.web_port);

        // The question form talks to this server's own /api/ask unless told otherwise.
        let ask_url = get("ASK_URL", dotenv)
            .unwrap_or_else(|| format!("http://{}:{web_port}/api/ask", ask_host(&web_bind)));

        let backend_raw = get_str("ASK_BACKEND", dotenv, "placeholder");
        let Some(ask_backend) = AskBackend::parse(&backend_raw) else {
            bail!("unknown ASK_BACKEND {backend_raw:?} (expected placeholder or retriever)");
        };

        Ok(Config {
            web_bind,
            web_port,
            cors_origin: get("CORS_ORIGIN", dotenv),
            ask_url,
            qna_url: get_str("QNA_URL", dotenv, &defaults.qna_url),
            retrieve_url: get_str("RETRIEVE_URL", dotenv, &defaults.retrieve_url),
            summarize_url: get_str("SUMMARIZE_URL", dotenv, &defaults.summarize_url),
            ask_backend,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.web_bind, self.web_port)
    }
}
