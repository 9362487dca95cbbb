use std::path::Path;

use async_trait::async_trait;
use image::GenericImageView;
use lopdf::{dictionary, Document, Object, Stream};

use crate::application::ports::{ConversionEngine, ConversionError};

/// Wraps a PNG or JPEG as a single-page PDF.
///
/// The page's MediaBox equals the image dimensions (one pixel per point) and
/// the pixel data is embedded losslessly: JPEG bytes pass through verbatim as
/// a DCTDecode stream, PNG is decoded once and embedded as raw samples.
pub struct ImagePdfEngine;

#[async_trait]
impl ConversionEngine for ImagePdfEngine {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let data = tokio::fs::read(input).await?;
        let jpeg_passthrough = matches!(
            input.extension().and_then(|e| e.to_str()),
            Some("jpg") | Some("jpeg")
        );

        let pdf = wrap_image(&data, jpeg_passthrough)?;
        tokio::fs::write(output, pdf).await?;
        Ok(())
    }
}

fn wrap_image(data: &[u8], jpeg_passthrough: bool) -> Result<Vec<u8>, ConversionError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ConversionError::Backend(format!("failed to load image: {}", e)))?;
    let (width, height) = img.dimensions();

    let grayscale = matches!(
        img.color(),
        image::ColorType::L8 | image::ColorType::L16 | image::ColorType::La8
    );
    let color_space = if grayscale { "DeviceGray" } else { "DeviceRGB" };

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();

    let image_stream = if jpeg_passthrough {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            data.to_vec(),
        )
    } else {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            img.to_rgb8().into_raw(),
        )
    };
    let image_id = doc.add_object(Object::Stream(image_stream));

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    });

    // Draw the image over the full page.
    let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im1 Do\nQ\n", width, height);
    let content_id = doc.add_object(Object::Stream(Stream::new(
        dictionary! {},
        content.into_bytes(),
    )));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (width as i64).into(),
            (height as i64).into(),
        ],
        "Resources" => resources_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ConversionError::Backend(format!("failed to write PDF: {}", e)))?;
    Ok(out)
}
