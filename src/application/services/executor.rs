use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{ConversionEngine, ConversionError};
use crate::domain::TargetFormat;

use super::ConversionStrategy;

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub output_filename: String,
    pub content_type: &'static str,
}

/// Resolves a strategy for the input's extension and runs the matching
/// engine against concrete paths. Backend failures all surface as a single
/// `ConversionError`; the destination file exists only on success.
pub struct ConversionExecutor {
    image_pdf: Arc<dyn ConversionEngine>,
    pdf_docx: Arc<dyn ConversionEngine>,
    docx_pdf: Arc<dyn ConversionEngine>,
    pdf_png: Arc<dyn ConversionEngine>,
    pdf_jpg: Arc<dyn ConversionEngine>,
}

impl ConversionExecutor {
    pub fn new(
        image_pdf: Arc<dyn ConversionEngine>,
        pdf_docx: Arc<dyn ConversionEngine>,
        docx_pdf: Arc<dyn ConversionEngine>,
        pdf_png: Arc<dyn ConversionEngine>,
        pdf_jpg: Arc<dyn ConversionEngine>,
    ) -> Self {
        Self {
            image_pdf,
            pdf_docx,
            docx_pdf,
            pdf_png,
            pdf_jpg,
        }
    }

    #[tracing::instrument(skip(self), fields(input = %input.display(), target = %target))]
    pub async fn execute(
        &self,
        input: &Path,
        target: TargetFormat,
        output: &Path,
    ) -> Result<Execution, ConversionError> {
        let source_ext = input
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let strategy = ConversionStrategy::resolve(&source_ext, target).ok_or_else(|| {
            ConversionError::UnsupportedPairing {
                source_ext: source_ext.clone(),
                target: target.to_string(),
            }
        })?;

        tracing::debug!(?strategy, "Strategy resolved");

        let engine = match strategy {
            ConversionStrategy::ImageToPdf => &self.image_pdf,
            ConversionStrategy::PdfToDocx => &self.pdf_docx,
            ConversionStrategy::DocxToPdf => &self.docx_pdf,
            ConversionStrategy::PdfToPng => &self.pdf_png,
            ConversionStrategy::PdfToJpg => &self.pdf_jpg,
        };

        engine.convert(input, output).await?;

        let output_filename = output
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ConversionError::Backend("output path has no filename".to_string()))?
            .to_string();

        Ok(Execution {
            output_filename,
            content_type: strategy.content_type(),
        })
    }
}
