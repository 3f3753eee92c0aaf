use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use image::{DynamicImage, ImageFormat, ImageReader, imageops::FilterType};
use tracing::{debug, info};

use crate::{
    database::ports::products::ProductRepository,
    domain::product::{Product, append_images},
    error::{CatalogError, Result},
};

/// Widest derived image the pipeline writes, in pixels.
pub const MAX_IMAGE_WIDTH: u32 = 800;

pub const PROCESSED_PREFIX: &str = "processed_";

/// A file the upload layer already wrote to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub path: PathBuf,
    /// Name assigned on disk, used to derive the processed filename.
    pub filename: String,
}

/// Derives bounded-width copies of uploaded images and attaches them to
/// products.
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    output_dir: PathBuf,
    max_width: u32,
}

impl ImagePipeline {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_width: MAX_IMAGE_WIDTH,
        }
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width.max(1);
        self
    }

    /// Resize every upload concurrently and return the derived filenames in
    /// input order.
    ///
    /// The first failure fails the whole batch. Files written by resizes that
    /// already finished stay on disk.
    pub async fn process(&self, uploads: &[StagedUpload]) -> Result<Vec<String>> {
        let tasks = uploads.iter().map(|upload| {
            let source = upload.path.clone();
            let filename = format!("{PROCESSED_PREFIX}{}", upload.filename);
            let destination = self.output_dir.join(&filename);
            let max_width = self.max_width;

            async move {
                tokio::task::spawn_blocking(move || {
                    resize_to_width(&source, &destination, max_width)
                })
                .await
                .map_err(|err| {
                    CatalogError::Internal(format!(
                        "Failed to join resize task: {err}"
                    ))
                })??;

                debug!(%filename, "processed upload");
                Ok::<_, CatalogError>(filename)
            }
        });

        try_join_all(tasks).await
    }

    /// Process `uploads` and append the results to the product's images,
    /// keeping the first six. With no uploads the current list is returned
    /// untouched.
    pub async fn attach(
        &self,
        products: &dyn ProductRepository,
        product: &Product,
        uploads: &[StagedUpload],
    ) -> Result<Vec<String>> {
        if uploads.is_empty() {
            return Ok(product.imagens.clone());
        }

        let processed = self.process(uploads).await?;
        let imagens = append_images(&product.imagens, &processed);

        if !products.set_images(product.id, &imagens).await? {
            return Err(CatalogError::NotFound(format!(
                "product {} disappeared during upload",
                product.id
            )));
        }

        info!(
            product_id = product.id,
            received = processed.len(),
            stored = imagens.len(),
            "attached images to product"
        );
        Ok(imagens)
    }
}

fn resize_to_width(source: &Path, destination: &Path, max_width: u32) -> Result<()> {
    if is_svg(destination) {
        // Vector data has no pixel width to bound.
        std::fs::copy(source, destination)?;
        return Ok(());
    }

    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    let img = if img.width() > max_width {
        let height = (u64::from(img.height()) * u64::from(max_width)
            / u64::from(img.width()))
        .max(1);
        let height = u32::try_from(height).unwrap_or(u32::MAX);
        img.resize_exact(max_width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let format = ImageFormat::from_path(destination)?;
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(destination, format)?;
    Ok(())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
