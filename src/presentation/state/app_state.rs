use std::sync::Arc;

use crate::application::ports::{ArtifactStore, FileRepository, JobRepository};
use crate::application::services::ConversionMessage;

#[derive(Clone)]
pub struct AppState {
    pub files: Arc<dyn FileRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub uploads: Arc<dyn ArtifactStore>,
    pub outputs: Arc<dyn ArtifactStore>,
    pub messages: Arc<dyn ArtifactStore>,
    pub conversion_queue: async_channel::Sender<ConversionMessage>,
}
