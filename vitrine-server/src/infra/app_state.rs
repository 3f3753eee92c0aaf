use std::{fmt, sync::Arc};

use vitrine_core::{ImagePipeline, ProductRepository};

use crate::infra::{config::Config, upload::UploadLimits};

/// Shared handler state. The store handle is injected so handlers never
/// reach for process-wide globals.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    products: Arc<dyn ProductRepository>,
    image_pipeline: Arc<ImagePipeline>,
    upload_limits: UploadLimits,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("image_pipeline", &self.image_pipeline)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, products: Arc<dyn ProductRepository>) -> Self {
        let image_pipeline = Arc::new(
            ImagePipeline::new(config.uploads_dir.clone())
                .with_max_width(config.image_max_width),
        );
        let upload_limits = config.upload_limits();

        Self {
            config,
            products,
            image_pipeline,
            upload_limits,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn products(&self) -> &Arc<dyn ProductRepository> {
        &self.products
    }

    pub fn image_pipeline(&self) -> &Arc<ImagePipeline> {
        &self.image_pipeline
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        &self.upload_limits
    }
}
