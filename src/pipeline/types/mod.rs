mod decoded_image;
mod features;
mod image_upload;

pub use decoded_image::{ColorMode, DecodedImage};
pub use features::{ColorFeatures, ColorLabel, ColorSignal, FeatureResponse, FeatureSet};
pub use image_upload::ImageUpload;
