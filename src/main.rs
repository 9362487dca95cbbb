use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use docmorph::application::services::{ConversionExecutor, ConversionWorker};
use docmorph::infrastructure::conversion::{
    ImagePdfEngine, LibreOfficeEngine, PdfDocxEngine, PdfImageEngine,
};
use docmorph::infrastructure::observability::{init_tracing, TracingConfig};
use docmorph::infrastructure::persistence::{InMemoryFileRepository, InMemoryJobRepository};
use docmorph::infrastructure::storage::LocalArtifactStore;
use docmorph::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let uploads = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.upload_dir,
    ))?);
    let outputs = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.output_dir,
    ))?);
    let messages = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.message_dir,
    ))?);

    let files = Arc::new(InMemoryFileRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());

    let executor = Arc::new(ConversionExecutor::new(
        Arc::new(ImagePdfEngine),
        Arc::new(PdfDocxEngine),
        Arc::new(LibreOfficeEngine::new(&settings.conversion.soffice_binary)),
        Arc::new(PdfImageEngine::png()),
        Arc::new(PdfImageEngine::jpeg()),
    ));

    let conversion_queue = ConversionWorker::spawn_pool(
        settings.conversion.worker_count,
        settings.conversion.queue_capacity,
        executor,
        files.clone(),
        jobs.clone(),
        uploads.clone(),
        outputs.clone(),
    );

    let state = AppState {
        files,
        jobs,
        uploads,
        outputs,
        messages,
        conversion_queue,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
