// src/services/image_processor.rs
use crate::errors::VectorQuoteError;
use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat as ImgFormat;

/// Hard upload ceiling: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ACCEPTED_CONTENT_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
];

const PREVIEW_EDGE: u32 = 256;

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Checks the declared media type against the allow-list.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), VectorQuoteError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if ACCEPTED_CONTENT_TYPES.contains(&essence.as_str()) {
            Ok(())
        } else {
            Err(VectorQuoteError::InvalidFileType(content_type.to_string()))
        }
    }

    pub fn validate_size(&self, size: usize) -> Result<(), VectorQuoteError> {
        if size > MAX_UPLOAD_BYTES {
            return Err(VectorQuoteError::FileTooLarge { size });
        }
        Ok(())
    }

    /// Builds a data URL for the upload preview. Decodable images are shrunk to a
    /// PNG thumbnail; anything the decoder rejects is passed through as-is.
    pub fn preview_data_url(&self, data: &[u8], content_type: &str) -> String {
        match self.thumbnail_png(data) {
            Ok(png) => format!(
                "data:image/png;base64,{}",
                general_purpose::STANDARD.encode(png)
            ),
            Err(e) => {
                log::debug!("Falling back to raw preview: {}", e);
                format!(
                    "data:{};base64,{}",
                    content_type,
                    general_purpose::STANDARD.encode(data)
                )
            }
        }
    }

    fn thumbnail_png(&self, data: &[u8]) -> Result<Vec<u8>, VectorQuoteError> {
        let img = image::load_from_memory(data)
            .map_err(|e| VectorQuoteError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let thumb = img.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE);

        let mut output = Vec::new();
        thumb
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                VectorQuoteError::ImageProcessing(format!("Failed to encode preview: {}", e))
            })?;

        Ok(output)
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
