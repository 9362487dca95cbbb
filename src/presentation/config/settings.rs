use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub conversion: ConversionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: String,
    pub output_dir: String,
    pub message_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionSettings {
    /// Size of the worker pool. Also bounds subprocess fan-out, since each
    /// docx->pdf job spawns a renderer process.
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub soffice_binary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layered load: built-in defaults, then `appsettings.<env>` if present,
    /// then `DOCMORPH__`-prefixed environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("storage.upload_dir", "data/uploads")?
            .set_default("storage.output_dir", "data/outputs")?
            .set_default("storage.message_dir", "data/messages")?
            .set_default("conversion.worker_count", 4)?
            .set_default("conversion.queue_capacity", 64)?
            .set_default("conversion.soffice_binary", "soffice")?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(config::Environment::with_prefix("DOCMORPH").separator("__"))
            .build()?
            .try_deserialize()
    }
}
