mod image_pdf_engine;
mod libreoffice_engine;
mod pdf_docx_engine;
mod pdf_image_engine;

pub use image_pdf_engine::ImagePdfEngine;
pub use libreoffice_engine::LibreOfficeEngine;
pub use pdf_docx_engine::PdfDocxEngine;
pub use pdf_image_engine::PdfImageEngine;
