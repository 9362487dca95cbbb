use crate::domain::TargetFormat;

/// The fixed pairing table mapping (source extension, target format) to a
/// conversion operation.
///
/// The table is intentionally asymmetric and non-transitive: it encodes what
/// the backends can actually do, not a general format graph. pdf->docx and
/// docx->pdf are separate one-directional operations with different backends
/// and fidelity; do not "complete" the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// png/jpg/jpeg -> pdf: wrap the raster as a single PDF page.
    ImageToPdf,
    /// pdf -> docx: structural reconstruction into an editable document.
    PdfToDocx,
    /// docx -> pdf: delegate to the external rendering engine.
    DocxToPdf,
    /// pdf -> png: first embedded raster of the first page, re-encoded.
    PdfToPng,
    /// pdf -> jpg: as above, JPEG at fixed quality.
    PdfToJpg,
}

impl ConversionStrategy {
    /// Resolves the single applicable operation, or `None` for any pairing
    /// outside the table. Callers must reject unsupported pairings before
    /// any I/O is attempted.
    pub fn resolve(source_ext: &str, target: TargetFormat) -> Option<Self> {
        match (source_ext.to_lowercase().as_str(), target) {
            ("png" | "jpg" | "jpeg", TargetFormat::Pdf) => Some(Self::ImageToPdf),
            ("pdf", TargetFormat::Docx) => Some(Self::PdfToDocx),
            ("docx", TargetFormat::Pdf) => Some(Self::DocxToPdf),
            ("pdf", TargetFormat::Png) => Some(Self::PdfToPng),
            ("pdf", TargetFormat::Jpg) => Some(Self::PdfToJpg),
            _ => None,
        }
    }

    /// Content type of the file this operation produces.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::ImageToPdf | Self::DocxToPdf => TargetFormat::Pdf.as_mime(),
            Self::PdfToDocx => TargetFormat::Docx.as_mime(),
            Self::PdfToPng => TargetFormat::Png.as_mime(),
            Self::PdfToJpg => TargetFormat::Jpg.as_mime(),
        }
    }
}
