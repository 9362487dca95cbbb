use std::io::{Cursor, Write};
use std::path::Path;

use async_trait::async_trait;
use lopdf::Document;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::application::ports::{ConversionEngine, ConversionError};

const WORDPROCESSINGML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Structural PDF to DOCX reconstruction.
///
/// Converts the whole document, not just the first page: text is extracted
/// page by page and rebuilt as one paragraph per line in a minimal OOXML
/// package. The archive is assembled fully in memory and written to the
/// destination exactly once, so a failed conversion never leaves a partial
/// package behind.
pub struct PdfDocxEngine;

#[async_trait]
impl ConversionEngine for PdfDocxEngine {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let data = tokio::fs::read(input).await?;

        let doc = Document::load_mem(&data)
            .map_err(|e| ConversionError::Backend(format!("failed to parse PDF: {}", e)))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ConversionError::EmptyDocument);
        }

        let mut paragraphs = Vec::new();
        for page_number in pages.keys() {
            if let Ok(page_text) = doc.extract_text(&[*page_number]) {
                for line in page_text.lines() {
                    paragraphs.push(line.to_string());
                }
            }
        }

        let package = build_package(&paragraphs)?;
        tokio::fs::write(output, package).await?;
        Ok(())
    }
}

fn build_package(paragraphs: &[String]) -> Result<Vec<u8>, ConversionError> {
    let document_xml = build_document_xml(paragraphs)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    archive
        .start_file("[Content_Types].xml", options)
        .and_then(|_| archive.write_all(CONTENT_TYPES_XML.as_bytes()).map_err(Into::into))
        .and_then(|_| archive.start_file("_rels/.rels", options))
        .and_then(|_| archive.write_all(ROOT_RELS_XML.as_bytes()).map_err(Into::into))
        .and_then(|_| archive.start_file("word/document.xml", options))
        .and_then(|_| archive.write_all(&document_xml).map_err(Into::into))
        .map_err(|e| ConversionError::Backend(format!("DOCX packaging: {}", e)))?;

    let cursor = archive
        .finish()
        .map_err(|e| ConversionError::Backend(format!("DOCX packaging: {}", e)))?;

    Ok(cursor.into_inner())
}

fn build_document_xml(paragraphs: &[String]) -> Result<Vec<u8>, ConversionError> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", WORDPROCESSINGML_NS));
    writer.write_event(Event::Start(document))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in paragraphs {
        writer.write_event(Event::Start(BytesStart::new("w:p")))?;
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;

        let mut text = BytesStart::new("w:t");
        text.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(text))?;
        writer.write_event(Event::Text(BytesText::new(paragraph)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;

        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner())
}
