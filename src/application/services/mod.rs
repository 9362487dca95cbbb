mod executor;
mod strategy;
mod worker;

pub use executor::{ConversionExecutor, Execution};
pub use strategy::ConversionStrategy;
pub use worker::{ConversionMessage, ConversionWorker};
