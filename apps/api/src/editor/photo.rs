//! Converts uploaded image bytes into the opaque `data:` URL stored on the document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoLoadError {
    #[error("no image data was provided")]
    Empty,

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Validates `bytes` as an image and returns `data:<mime>;base64,<payload>`.
pub fn encode_photo(bytes: &[u8]) -> Result<String, PhotoLoadError> {
    if bytes.is_empty() {
        return Err(PhotoLoadError::Empty);
    }
    let format = image::guess_format(bytes).map_err(|_| PhotoLoadError::UnsupportedFormat)?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        _ => return Err(PhotoLoadError::UnsupportedFormat),
    };
    // Decode once so a truncated upload is rejected here and not at export time.
    image::load_from_memory_with_format(bytes, format)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Inverse of [`encode_photo`]; `None` for anything that is not a base64 data URL.
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
pub(crate) fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 30, 30, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
