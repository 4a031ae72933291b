use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Red,
    Green,
    Blue,
    White,
    Black,
    Mixed,
}

impl ColorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorLabel::Red => "red",
            ColorLabel::Green => "green",
            ColorLabel::Blue => "blue",
            ColorLabel::White => "white",
            ColorLabel::Black => "black",
            ColorLabel::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-channel mean over every pixel of an RGB image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSignal {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorSignal {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFeatures {
    pub primary: ColorLabel,
    pub secondary: ColorLabel,
}

impl ColorFeatures {
    /// Pairs a primary label with its placeholder secondary: black for white, white otherwise.
    pub fn from_primary(primary: ColorLabel) -> Self {
        let secondary = if primary == ColorLabel::White {
            ColorLabel::Black
        } else {
            ColorLabel::White
        };
        Self { primary, secondary }
    }

    /// Result substituted when color analysis faults.
    pub fn fallback() -> Self {
        Self {
            primary: ColorLabel::Blue,
            secondary: ColorLabel::White,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub color: ColorFeatures,
    pub pattern: String,
    pub style: String,
    pub neckline: String,
    pub sleeve: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureResponse {
    pub features: FeatureSet,
    pub category: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_rule() {
        for primary in [
            ColorLabel::Red,
            ColorLabel::Green,
            ColorLabel::Blue,
            ColorLabel::Black,
            ColorLabel::Mixed,
        ] {
            assert_eq!(
                ColorFeatures::from_primary(primary).secondary,
                ColorLabel::White
            );
        }
        assert_eq!(
            ColorFeatures::from_primary(ColorLabel::White).secondary,
            ColorLabel::Black
        );
    }

    #[test]
    fn test_label_serializes_lowercase() {
        let json = serde_json::to_value(ColorFeatures::fallback()).unwrap();
        assert_eq!(json["primary"], "blue");
        assert_eq!(json["secondary"], "white");
        assert_eq!(ColorLabel::Mixed.to_string(), "mixed");
    }
}
