pub mod feature_assembler;
pub mod image;

pub use feature_assembler::FeatureAssembler;
pub use image::{ColorAnalysisService, ImageDecoder};
