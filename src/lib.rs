pub mod config;
pub mod error;
pub mod network;
pub mod pipeline;

pub use config::Settings;
pub use error::{AnalysisFault, AppError};

pub use network::Server;
pub use pipeline::{FeaturePipeline, FeatureResponse, ImageUpload};
