use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::export::{ExportError, PageEncoder};
use crate::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// A4 in PostScript points (1/72 in).
pub const A4_WIDTH_PT: f32 = PAGE_WIDTH_MM * POINTS_PER_MM;
pub const A4_HEIGHT_PT: f32 = PAGE_HEIGHT_MM * POINTS_PER_MM;

const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Writes a one-page PDF whose only content is the raster, stretched to the page edges.
#[derive(Debug, Clone, Copy)]
pub struct LopdfEncoder {
    pub jpeg_quality: u8,
}

impl Default for LopdfEncoder {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PageEncoder for LopdfEncoder {
    fn encode(&self, raster: &RgbaImage) -> Result<Vec<u8>, ExportError> {
        let encoding = |e: &dyn std::fmt::Display| ExportError::EncodingFailed(e.to_string());

        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::EncodingFailed("raster is empty".into()));
        }

        // JPEG has no alpha channel; the page background is always opaque.
        let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| encoding(&e))?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        let image_id = doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        A4_WIDTH_PT.into(),
                        0.into(),
                        0.into(),
                        A4_HEIGHT_PT.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im1".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(|e| encoding(&e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im1" => image_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
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
        doc.save_to(&mut out).map_err(|e| encoding(&e))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_single_a4_page_with_one_image() {
        let raster = RgbaImage::from_pixel(60, 80, Rgba([20, 40, 60, 255]));
        let bytes = LopdfEncoder::default().encode(&raster).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let dims: Vec<f32> = media_box
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(dims.len(), 4);
        assert!((dims[2] - A4_WIDTH_PT).abs() < 0.01);
        assert!((dims[3] - A4_HEIGHT_PT).abs() < 0.01);

        let images = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| s.dict.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(b"Image".as_slice()))
            .count();
        assert_eq!(images, 1);
    }

    #[test]
    fn test_empty_raster_is_an_encoding_error() {
        let raster = RgbaImage::new(0, 0);
        let result = LopdfEncoder::default().encode(&raster);
        assert!(matches!(result, Err(ExportError::EncodingFailed(_))));
    }
}
