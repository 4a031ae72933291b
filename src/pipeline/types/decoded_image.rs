use image::{ColorType, DynamicImage, RgbImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    Rgba,
    Grayscale16,
    GrayscaleAlpha16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
    Other,
}

impl From<ColorType> for ColorMode {
    fn from(color_type: ColorType) -> Self {
        match color_type {
            ColorType::L8 => ColorMode::Grayscale,
            ColorType::La8 => ColorMode::GrayscaleAlpha,
            ColorType::Rgb8 => ColorMode::Rgb,
            ColorType::Rgba8 => ColorMode::Rgba,
            ColorType::L16 => ColorMode::Grayscale16,
            ColorType::La16 => ColorMode::GrayscaleAlpha16,
            ColorType::Rgb16 => ColorMode::Rgb16,
            ColorType::Rgba16 => ColorMode::Rgba16,
            ColorType::Rgb32F => ColorMode::Rgb32F,
            ColorType::Rgba32F => ColorMode::Rgba32F,
            _ => ColorMode::Other,
        }
    }
}

/// A decoded pixel grid in whatever color mode the codec produced.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from(self.image.color())
    }

    pub fn is_rgb(&self) -> bool {
        self.color_mode() == ColorMode::Rgb
    }

    /// Converts to 8-bit RGB, dropping alpha and expanding grayscale. Dimensions are kept.
    pub fn to_rgb(&self) -> DecodedImage {
        DecodedImage::new(DynamicImage::ImageRgb8(self.image.to_rgb8()))
    }

    /// The RGB pixel grid, if this image is already RGB.
    pub fn rgb_pixels(&self) -> Option<&RgbImage> {
        self.image.as_rgb8()
    }

    pub fn into_inner(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}
