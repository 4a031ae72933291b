use crate::pipeline::types::{ColorFeatures, FeatureResponse, FeatureSet};

// Placeholder values until a garment model is wired in.
pub const PATTERN: &str = "solid";
pub const STYLE: &str = "casual";
pub const NECKLINE: &str = "round";
pub const SLEEVE: &str = "short";
pub const CATEGORY: &str = "t-shirt";
pub const CONFIDENCE: f64 = 0.92;

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler;

impl FeatureAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, color: ColorFeatures) -> FeatureResponse {
        FeatureResponse {
            features: FeatureSet {
                color,
                pattern: PATTERN.to_string(),
                style: STYLE.to_string(),
                neckline: NECKLINE.to_string(),
                sleeve: SLEEVE.to_string(),
            },
            category: CATEGORY.to_string(),
            confidence: CONFIDENCE,
        }
    }
}
