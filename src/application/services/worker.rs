use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, ConversionError, FileRepository, JobRepository,
    RepositoryError,
};
use crate::domain::{JobId, StoragePath, PROGRESS_CONVERTING};

use super::ConversionExecutor;

pub struct ConversionMessage {
    pub job_id: JobId,
}

/// Consumes queued conversion jobs and drives each one to a terminal state.
///
/// Every failure discovered during execution is captured into the job record
/// as `failed`; nothing propagates out of the worker task, since no caller is
/// present to observe it. Once a job starts it runs to completion; there is
/// no cancellation and no timeout on the external renderer.
pub struct ConversionWorker {
    receiver: async_channel::Receiver<ConversionMessage>,
    executor: Arc<ConversionExecutor>,
    files: Arc<dyn FileRepository>,
    jobs: Arc<dyn JobRepository>,
    uploads: Arc<dyn ArtifactStore>,
    outputs: Arc<dyn ArtifactStore>,
}

impl ConversionWorker {
    pub fn new(
        receiver: async_channel::Receiver<ConversionMessage>,
        executor: Arc<ConversionExecutor>,
        files: Arc<dyn FileRepository>,
        jobs: Arc<dyn JobRepository>,
        uploads: Arc<dyn ArtifactStore>,
        outputs: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            receiver,
            executor,
            files,
            jobs,
            uploads,
            outputs,
        }
    }

    /// Spawns a bounded worker pool sharing one in-process queue and returns
    /// the submission side. Bounding the pool bounds subprocess fan-out: each
    /// docx->pdf job spawns an OS process.
    pub fn spawn_pool(
        worker_count: usize,
        queue_capacity: usize,
        executor: Arc<ConversionExecutor>,
        files: Arc<dyn FileRepository>,
        jobs: Arc<dyn JobRepository>,
        uploads: Arc<dyn ArtifactStore>,
        outputs: Arc<dyn ArtifactStore>,
    ) -> async_channel::Sender<ConversionMessage> {
        let (sender, receiver) = async_channel::bounded(queue_capacity.max(1));

        for worker_index in 0..worker_count.max(1) {
            let worker = Self::new(
                receiver.clone(),
                Arc::clone(&executor),
                Arc::clone(&files),
                Arc::clone(&jobs),
                Arc::clone(&uploads),
                Arc::clone(&outputs),
            );
            tokio::spawn(worker.run(worker_index));
        }

        sender
    }

    pub async fn run(self, worker_index: usize) {
        tracing::info!(worker_index, "Conversion worker started");
        while let Ok(msg) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "conversion_job",
                worker_index,
                job_id = %msg.job_id.as_uuid(),
            );

            async {
                if let Err(e) = self.process_job(msg.job_id).await {
                    tracing::error!(error = %e, "Conversion job could not be recorded");
                }
            }
            .instrument(span)
            .await;
        }
        tracing::info!(worker_index, "Conversion worker stopped: channel closed");
    }

    async fn process_job(&self, job_id: JobId) -> Result<(), RepositoryError> {
        self.jobs.mark_running(job_id).await?;

        match self.convert(job_id).await {
            Ok(output_filename) => {
                tracing::info!(output_filename = %output_filename, "Conversion completed");
                self.jobs.mark_done(job_id, output_filename).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Conversion failed");
                self.jobs.mark_failed(job_id, &e.to_string()).await
            }
        }
    }

    async fn convert(&self, job_id: JobId) -> Result<String, WorkerError> {
        let job = self
            .jobs
            .get_by_id(job_id)
            .await?
            .ok_or(WorkerError::JobVanished)?;

        let file = self
            .files
            .get_by_id(job.file_id)
            .await?
            .ok_or(WorkerError::FileRecordMissing)?;

        let data = self.uploads.fetch(&file.storage_path).await?;

        // Stage the input under its original (sanitized) name so the engines
        // and the external renderer see the real extension and stem.
        let workdir = tempfile::tempdir().map_err(WorkerError::Workspace)?;
        let input_name = file.storage_path.as_str().to_string();
        let input_path = workdir.path().join(&input_name);
        tokio::fs::write(&input_path, &data)
            .await
            .map_err(WorkerError::Workspace)?;

        let output_name = format!("{}.{}", file.base_name(), job.target_format.extension());
        let output_path = workdir.path().join(&output_name);

        self.jobs
            .advance_progress(job_id, PROGRESS_CONVERTING)
            .await?;

        let execution = self
            .executor
            .execute(&input_path, job.target_format, &output_path)
            .await?;

        let output_bytes = tokio::fs::read(&output_path)
            .await
            .map_err(WorkerError::Workspace)?;

        self.outputs
            .put(
                &StoragePath::for_output(&job_id, &execution.output_filename),
                output_bytes.into(),
            )
            .await?;

        Ok(execution.output_filename)
    }
}

#[derive(Debug, thiserror::Error)]
enum WorkerError {
    #[error("job record vanished before execution")]
    JobVanished,
    #[error("Uploaded file not found")]
    FileRecordMissing,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("artifact store: {0}")]
    Artifact(#[from] ArtifactStoreError),
    #[error("{0}")]
    Conversion(#[from] ConversionError),
    #[error("workspace io: {0}")]
    Workspace(std::io::Error),
}
