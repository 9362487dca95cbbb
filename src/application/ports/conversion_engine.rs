use std::path::Path;

use async_trait::async_trait;

/// One conversion backend bound to a single (source, target) pairing.
///
/// An engine reads the input path and writes the destination exactly once,
/// on success only; a failed conversion must never leave a partial file at
/// the output path.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// Single failure contract for all backends. The cause string ends up in the
/// job record's error field, so every variant reads as a sentence fragment a
/// caller can show verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("PDF has no pages")]
    EmptyDocument,
    #[error("PDF embeds no raster image on the first page")]
    NoEmbeddedRaster,
    #[error("renderer reported success but produced no output")]
    RendererOutputMissing,
    #[error("unsupported conversion: {source_ext} -> {target}")]
    UnsupportedPairing { source_ext: String, target: String },
    #[error("conversion backend failed: {0}")]
    Backend(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
