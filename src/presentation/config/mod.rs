mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ConversionSettings, LoggingSettings, ServerSettings, Settings, StorageSettings,
};
