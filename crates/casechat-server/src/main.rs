use std::sync::Arc;

use casechat_core::{
    answer,
    config::Config,
    transport::{HttpTransport, JsonTransport},
};
use casechat_server::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "casechat_server=info,casechat_core=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        qna = %config.qna_url,
        retrieve = %config.retrieve_url,
        summarize = %config.summarize_url,
        ask_backend = ?config.ask_backend,
        "backend endpoints"
    );

    let transport: Arc<dyn JsonTransport> = Arc::new(HttpTransport::new());
    let answerer = answer::from_config(&config, Arc::clone(&transport));

    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(config, transport, answerer));
    let app = router(state)?;

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
