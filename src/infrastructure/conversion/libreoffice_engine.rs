use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{ConversionEngine, ConversionError};

/// DOCX to PDF through a headless LibreOffice subprocess.
///
/// The subprocess's exit code is not a sufficient success signal; soffice is
/// known to exit zero without producing output. Success is verified by side
/// effect: the expected `<stem>.pdf` must exist non-empty in the output
/// directory, and is then renamed onto the destination path. The rename stays
/// within one directory, so it is atomic-or-fail and never leaves a partial
/// file at the destination. There is no timeout on the subprocess; callers
/// needing one must impose an external watchdog.
pub struct LibreOfficeEngine {
    binary: PathBuf,
}

impl LibreOfficeEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl ConversionEngine for LibreOfficeEngine {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let out_dir = output
            .parent()
            .ok_or_else(|| ConversionError::Backend("output path has no parent".to_string()))?;
        tokio::fs::create_dir_all(out_dir).await?;

        let result = Command::new(&self.binary)
            .arg("--headless")
            .arg("--nologo")
            .arg("--nofirststartwizard")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .output()
            .await
            .map_err(|e| {
                ConversionError::Backend(format!(
                    "failed to launch {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !result.status.success() {
            tracing::warn!(
                status = %result.status,
                stderr = %String::from_utf8_lossy(&result.stderr),
                "Renderer exited non-zero; checking for output anyway"
            );
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| ConversionError::Backend("input path has no stem".to_string()))?;
        let produced = out_dir.join(stem).with_extension("pdf");

        match tokio::fs::metadata(&produced).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Err(ConversionError::RendererOutputMissing),
        }

        if produced != output {
            tokio::fs::rename(&produced, output).await?;
        }

        Ok(())
    }
}
