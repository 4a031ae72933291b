use std::borrow::Cow;
use std::sync::Arc;

use image::RgbImage;

use crate::error::AnalysisFault;
use crate::pipeline::observer::{PipelineObserver, TracingObserver};
use crate::pipeline::types::{ColorFeatures, ColorLabel, ColorSignal, DecodedImage};

const WHITE_THRESHOLD: f64 = 200.0;
const BLACK_THRESHOLD: f64 = 50.0;

/// Classifies the dominant color of a decoded image.
#[derive(Clone)]
pub struct ColorAnalysisService {
    observer: Arc<dyn PipelineObserver>,
}

impl Default for ColorAnalysisService {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl ColorAnalysisService {
    pub fn new(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }

    /// Never fails: an analysis fault yields `ColorFeatures::fallback()`.
    pub fn analyze(&self, image: &DecodedImage) -> ColorFeatures {
        self.try_analyze(image).unwrap_or_else(|fault| {
            self.observer.fallback_triggered(&fault);
            ColorFeatures::fallback()
        })
    }

    pub fn try_analyze(&self, image: &DecodedImage) -> Result<ColorFeatures, AnalysisFault> {
        let normalized = Self::normalize(image);
        let pixels = normalized
            .rgb_pixels()
            .ok_or(AnalysisFault::UnreadablePixels)?;
        let signal = Self::average_color(pixels)?;
        let color = ColorFeatures::from_primary(Self::classify(&signal));
        self.observer.classification_complete(&signal, &color);
        Ok(color)
    }

    fn normalize(image: &DecodedImage) -> Cow<'_, DecodedImage> {
        if image.is_rgb() {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(image.to_rgb())
        }
    }

    pub fn average_color(image: &RgbImage) -> Result<ColorSignal, AnalysisFault> {
        let (width, height) = image.dimensions();
        let count = u64::from(width) * u64::from(height);
        if count == 0 {
            return Err(AnalysisFault::EmptyImage { width, height });
        }

        let mut sums = [0u64; 3];
        for pixel in image.pixels() {
            sums[0] += u64::from(pixel[0]);
            sums[1] += u64::from(pixel[1]);
            sums[2] += u64::from(pixel[2]);
        }

        let count = count as f64;
        let signal = ColorSignal::new(
            sums[0] as f64 / count,
            sums[1] as f64 / count,
            sums[2] as f64 / count,
        );
        if !signal.is_finite() {
            return Err(AnalysisFault::NonFiniteAverage {
                r: signal.r,
                g: signal.g,
                b: signal.b,
            });
        }
        Ok(signal)
    }

    /// First matching rule wins: a strictly dominant channel in R, G, B order, then the
    /// white/black thresholds, then mixed.
    pub fn classify(signal: &ColorSignal) -> ColorLabel {
        let ColorSignal { r, g, b } = *signal;
        if r > g && r > b {
            ColorLabel::Red
        } else if g > r && g > b {
            ColorLabel::Green
        } else if b > r && b > g {
            ColorLabel::Blue
        } else if r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD {
            ColorLabel::White
        } else if r < BLACK_THRESHOLD && g < BLACK_THRESHOLD && b < BLACK_THRESHOLD {
            ColorLabel::Black
        } else {
            ColorLabel::Mixed
        }
    }
}
