use std::io::Cursor;

use image::{ImageError, ImageReader, Limits};

use crate::error::AppError;
use crate::pipeline::types::{DecodedImage, ImageUpload};

#[derive(Debug, Clone, Default)]
pub struct ImageDecoder {
    max_alloc_bytes: Option<u64>,
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    // Caps the memory the codec may allocate while decoding a single image.
    pub fn with_max_alloc_bytes(mut self, max_alloc_bytes: Option<u64>) -> Self {
        self.max_alloc_bytes = max_alloc_bytes;
        self
    }

    /// Rejects uploads whose declared content type is not `image/*`.
    pub fn validate(&self, upload: &ImageUpload) -> Result<(), AppError> {
        if upload.declares_image() {
            Ok(())
        } else {
            Err(AppError::InvalidInput {
                content_type: upload.content_type.clone(),
            })
        }
    }

    pub fn decode(&self, upload: &ImageUpload) -> Result<DecodedImage, AppError> {
        self.validate(upload)?;

        let mut reader = ImageReader::new(Cursor::new(upload.bytes.as_ref()))
            .with_guessed_format()
            .map_err(ImageError::IoError)?;
        if let Some(max_alloc) = self.max_alloc_bytes {
            let mut limits = Limits::default();
            limits.max_alloc = Some(max_alloc);
            reader.limits(limits);
        }
        let image = reader.decode()?;

        Ok(DecodedImage::new(image))
    }
}
