pub mod pipeline;

pub use pipeline::{ImagePipeline, MAX_IMAGE_WIDTH, StagedUpload};
