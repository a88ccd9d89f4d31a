use doc_assistant::api::{create_router, AppState};
use doc_assistant::infrastructure::{build_assistant, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,doc_assistant=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let assistant = Arc::new(build_assistant(&config)?);
    info!(
        embedding = %config.config.embedding.provider,
        llm = %config.config.llm.model,
        docs = %config.config.corpus.docs_path.display(),
        "assistant initialized"
    );

    // Serve health checks while the first index builds.
    let indexer = assistant.clone();
    tokio::spawn(async move {
        match indexer.ingest_and_index().await {
            Ok(report) => info!(
                version = report.version,
                documents = report.documents,
                chunks = report.chunks,
                "initial index ready"
            ),
            Err(e) => warn!(
                error = %e,
                "initial indexing failed, queries return index_not_ready until a rebuild succeeds"
            ),
        }
    });

    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );
    let app = create_router(AppState::new(assistant, config));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
