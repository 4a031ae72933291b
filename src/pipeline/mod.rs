pub mod feature_pipeline;
pub mod observer;
pub mod services;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use feature_pipeline::{FeaturePipeline, FeaturePipelineBuilder};
pub use observer::{PipelineObserver, TracingObserver};
pub use types::{ColorFeatures, ColorLabel, DecodedImage, FeatureResponse, ImageUpload};
