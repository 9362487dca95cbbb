use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use docmorph::application::ports::{
    ArtifactStore, ConversionEngine, ConversionError, FileRepository, JobRepository,
};
use docmorph::application::services::{ConversionExecutor, ConversionMessage, ConversionWorker};
use docmorph::domain::{
    FileId, FileRecord, Job, JobStatus, StoragePath, TargetFormat, PROGRESS_DONE,
};
use docmorph::infrastructure::persistence::{InMemoryFileRepository, InMemoryJobRepository};
use docmorph::infrastructure::storage::LocalArtifactStore;

/// Writes a fixed payload to the destination, standing in for a real engine.
struct StubEngine;

#[async_trait]
impl ConversionEngine for StubEngine {
    async fn convert(&self, _input: &Path, output: &Path) -> Result<(), ConversionError> {
        tokio::fs::write(output, b"%PDF-stub").await?;
        Ok(())
    }
}

struct FailingEngine;

#[async_trait]
impl ConversionEngine for FailingEngine {
    async fn convert(&self, _input: &Path, _output: &Path) -> Result<(), ConversionError> {
        Err(ConversionError::Backend("boom".into()))
    }
}

struct Harness {
    files: Arc<InMemoryFileRepository>,
    jobs: Arc<InMemoryJobRepository>,
    uploads: Arc<LocalArtifactStore>,
    outputs: Arc<LocalArtifactStore>,
    queue: async_channel::Sender<ConversionMessage>,
    _dir: tempfile::TempDir,
}

fn harness(engine: Arc<dyn ConversionEngine>) -> Harness {
    let dir = tempfile::TempDir::new().unwrap();
    let uploads = Arc::new(LocalArtifactStore::new(dir.path().join("uploads")).unwrap());
    let outputs = Arc::new(LocalArtifactStore::new(dir.path().join("outputs")).unwrap());
    let files = Arc::new(InMemoryFileRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());

    let executor = Arc::new(ConversionExecutor::new(
        Arc::clone(&engine),
        Arc::clone(&engine),
        Arc::clone(&engine),
        Arc::clone(&engine),
        engine,
    ));

    let queue = ConversionWorker::spawn_pool(
        2,
        8,
        executor,
        files.clone() as Arc<dyn FileRepository>,
        jobs.clone() as Arc<dyn JobRepository>,
        uploads.clone() as Arc<dyn ArtifactStore>,
        outputs.clone() as Arc<dyn ArtifactStore>,
    );

    Harness {
        files,
        jobs,
        uploads,
        outputs,
        queue,
        _dir: dir,
    }
}

async fn seed_upload(h: &Harness, filename: &str) -> FileRecord {
    let file_id = FileId::new();
    let storage_path = StoragePath::for_upload(&file_id, filename);
    h.uploads
        .put(&storage_path, bytes::Bytes::from_static(b"input bytes"))
        .await
        .unwrap();

    let record = FileRecord::new(
        file_id,
        filename.to_string(),
        11,
        Some("image/jpeg".to_string()),
        storage_path,
    );
    h.files.create(&record).await.unwrap();
    record
}

async fn wait_for_terminal(jobs: &InMemoryJobRepository, job: &Job) -> Job {
    for _ in 0..200 {
        let current = jobs.get_by_id(job.id).await.unwrap().unwrap();
        if current.status.is_terminal() {
            return current;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job never reached a terminal state");
}

#[tokio::test]
async fn given_valid_job_when_worker_runs_then_job_completes_and_output_is_stored() {
    let h = harness(Arc::new(StubEngine));
    let record = seed_upload(&h, "photo.jpg").await;

    let job = Job::new(record.id, TargetFormat::Pdf);
    h.jobs.create(&job).await.unwrap();
    h.queue
        .send(ConversionMessage { job_id: job.id })
        .await
        .unwrap();

    let finished = wait_for_terminal(&h.jobs, &job).await;

    assert_eq!(finished.status, JobStatus::Done);
    assert_eq!(finished.progress, PROGRESS_DONE);
    assert_eq!(finished.output_filename.as_deref(), Some("photo.pdf"));
    assert!(finished.error_message.is_none());

    let stored = h
        .outputs
        .fetch(&StoragePath::for_output(&job.id, "photo.pdf"))
        .await
        .unwrap();
    assert_eq!(stored, b"%PDF-stub");
}

#[tokio::test]
async fn given_engine_failure_when_worker_runs_then_job_fails_with_engine_message() {
    let h = harness(Arc::new(FailingEngine));
    let record = seed_upload(&h, "photo.jpg").await;

    let job = Job::new(record.id, TargetFormat::Pdf);
    h.jobs.create(&job).await.unwrap();
    h.queue
        .send(ConversionMessage { job_id: job.id })
        .await
        .unwrap();

    let finished = wait_for_terminal(&h.jobs, &job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(
        finished.error_message.as_deref(),
        Some("conversion backend failed: boom")
    );
    assert!(finished.output_filename.is_none());
}

#[tokio::test]
async fn given_missing_file_record_when_worker_runs_then_job_fails_with_not_found_message() {
    let h = harness(Arc::new(StubEngine));

    // No FileRecord and no uploaded bytes exist for this id.
    let job = Job::new(FileId::new(), TargetFormat::Pdf);
    h.jobs.create(&job).await.unwrap();
    h.queue
        .send(ConversionMessage { job_id: job.id })
        .await
        .unwrap();

    let finished = wait_for_terminal(&h.jobs, &job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(
        finished.error_message.as_deref(),
        Some("Uploaded file not found")
    );
}

#[tokio::test]
async fn given_unsupported_extension_when_worker_runs_then_job_fails_with_pairing_message() {
    let h = harness(Arc::new(StubEngine));
    let record = seed_upload(&h, "notes.txt").await;

    let job = Job::new(record.id, TargetFormat::Pdf);
    h.jobs.create(&job).await.unwrap();
    h.queue
        .send(ConversionMessage { job_id: job.id })
        .await
        .unwrap();

    let finished = wait_for_terminal(&h.jobs, &job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    let message = finished.error_message.unwrap();
    assert!(message.contains("txt"), "unexpected message: {message}");
    assert!(message.contains("pdf"), "unexpected message: {message}");
}

#[tokio::test]
async fn given_many_jobs_when_pool_drains_queue_then_every_job_terminates() {
    let h = harness(Arc::new(StubEngine));

    let mut submitted = Vec::new();
    for i in 0..12 {
        let record = seed_upload(&h, &format!("photo_{i}.jpg")).await;
        let job = Job::new(record.id, TargetFormat::Pdf);
        h.jobs.create(&job).await.unwrap();
        h.queue
            .send(ConversionMessage { job_id: job.id })
            .await
            .unwrap();
        submitted.push(job);
    }

    for job in &submitted {
        let finished = wait_for_terminal(&h.jobs, job).await;
        assert_eq!(finished.status, JobStatus::Done);
    }
}

#[tokio::test]
async fn given_finished_job_when_status_is_polled_repeatedly_then_record_is_stable() {
    let h = harness(Arc::new(StubEngine));
    let record = seed_upload(&h, "photo.jpg").await;

    let job = Job::new(record.id, TargetFormat::Pdf);
    h.jobs.create(&job).await.unwrap();
    h.queue
        .send(ConversionMessage { job_id: job.id })
        .await
        .unwrap();

    let first = wait_for_terminal(&h.jobs, &job).await;
    for _ in 0..5 {
        let again = h.jobs.get_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(again.status, first.status);
        assert_eq!(again.progress, first.progress);
        assert_eq!(again.output_filename, first.output_filename);
    }
}
