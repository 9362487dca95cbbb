use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};

use crate::application::ports::{ConversionEngine, ConversionError};

/// Fixed quality factor for JPEG output.
const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RasterTarget {
    Png,
    Jpeg,
}

/// Extracts the first embedded raster image from the first page of a PDF and
/// re-encodes it to PNG or JPEG.
///
/// This is an extraction, not a renderer: vector and text content is never
/// rasterized. A PDF with zero pages fails with `EmptyDocument`; a first page
/// without an image XObject fails with `NoEmbeddedRaster`.
pub struct PdfImageEngine {
    target: RasterTarget,
}

impl PdfImageEngine {
    pub fn png() -> Self {
        Self {
            target: RasterTarget::Png,
        }
    }

    pub fn jpeg() -> Self {
        Self {
            target: RasterTarget::Jpeg,
        }
    }
}

#[async_trait]
impl ConversionEngine for PdfImageEngine {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let data = tokio::fs::read(input).await?;

        let doc = Document::load_mem(&data)
            .map_err(|e| ConversionError::Backend(format!("failed to parse PDF: {}", e)))?;

        let pages = doc.get_pages();
        let first_page = *pages
            .values()
            .next()
            .ok_or(ConversionError::EmptyDocument)?;

        let stream = first_image_xobject(&doc, first_page)?;
        let decoded = decode_raster(&doc, stream)?;
        let rgb = decoded.to_rgb8();

        let mut encoded = Vec::new();
        match self.target {
            RasterTarget::Png => {
                DynamicImage::ImageRgb8(rgb)
                    .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
                    .map_err(|e| ConversionError::Backend(format!("PNG encoding: {}", e)))?;
            }
            RasterTarget::Jpeg => {
                JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
                    .encode_image(&rgb)
                    .map_err(|e| ConversionError::Backend(format!("JPEG encoding: {}", e)))?;
            }
        }

        tokio::fs::write(output, encoded).await?;
        Ok(())
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, ConversionError> {
    match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| ConversionError::Backend(format!("dangling reference: {}", e))),
        other => Ok(other),
    }
}

/// Walks the page's resources (following Parent inheritance one level at a
/// time) and returns the first XObject stream whose subtype is Image.
fn first_image_xobject(
    doc: &Document,
    page_id: lopdf::ObjectId,
) -> Result<&Stream, ConversionError> {
    let mut dict: &Dictionary = doc
        .get_dictionary(page_id)
        .map_err(|e| ConversionError::Backend(format!("invalid page object: {}", e)))?;

    let resources = loop {
        if let Ok(res) = dict.get(b"Resources") {
            break resolve(doc, res)?
                .as_dict()
                .map_err(|e| ConversionError::Backend(format!("invalid resources: {}", e)))?;
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                dict = resolve(doc, parent)?
                    .as_dict()
                    .map_err(|e| ConversionError::Backend(format!("invalid parent: {}", e)))?;
            }
            Err(_) => return Err(ConversionError::NoEmbeddedRaster),
        }
    };

    let xobjects = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj)?
            .as_dict()
            .map_err(|e| ConversionError::Backend(format!("invalid XObject dictionary: {}", e)))?,
        Err(_) => return Err(ConversionError::NoEmbeddedRaster),
    };

    for (_, value) in xobjects.iter() {
        if let Ok(Object::Stream(stream)) = resolve(doc, value) {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false);
            if is_image {
                return Ok(stream);
            }
        }
    }

    Err(ConversionError::NoEmbeddedRaster)
}

fn decode_raster(doc: &Document, stream: &Stream) -> Result<DynamicImage, ConversionError> {
    if filters(stream).iter().any(|f| f.as_slice() == b"DCTDecode") {
        return image::load_from_memory(&stream.content)
            .map_err(|e| ConversionError::Backend(format!("embedded JPEG decoding: {}", e)));
    }

    let samples = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let width = dict_i64(&stream.dict, b"Width")? as u32;
    let height = dict_i64(&stream.dict, b"Height")? as u32;
    let bits = dict_i64(&stream.dict, b"BitsPerComponent")?;
    if bits != 8 {
        return Err(ConversionError::Backend(format!(
            "unsupported bits per component: {}",
            bits
        )));
    }

    let color_space = stream
        .dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|c| resolve(doc, c).ok())
        .and_then(|c| c.as_name().ok())
        .unwrap_or(b"DeviceRGB");

    match color_space {
        b"DeviceRGB" => RgbImage::from_raw(width, height, samples)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| ConversionError::Backend("truncated RGB image data".to_string())),
        b"DeviceGray" => GrayImage::from_raw(width, height, samples)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| ConversionError::Backend("truncated grayscale image data".to_string())),
        other => Err(ConversionError::Backend(format!(
            "unsupported color space: {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|o| o.as_name().ok().map(|n| n.to_vec()))
            .collect(),
        _ => Vec::new(),
    }
}

fn dict_i64(dict: &Dictionary, key: &[u8]) -> Result<i64, ConversionError> {
    dict.get(key)
        .and_then(|o| o.as_i64())
        .map_err(|e| ConversionError::Backend(format!("image dictionary: {}", e)))
}
