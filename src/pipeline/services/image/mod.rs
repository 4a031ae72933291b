pub mod color_analysis_service;
pub mod image_decoder;

pub use color_analysis_service::ColorAnalysisService;
pub use image_decoder::ImageDecoder;
