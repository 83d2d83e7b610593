use std::path::Path;

use crate::convert::{DocumentFormat, PageConverter};
use crate::error::ProcessError;
use crate::page::PageImage;

/// Already-rasterized documents: one page per file.
pub struct ImageConverter;

impl ImageConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageConverter for ImageConverter {
    fn convert(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        let _span = tracing::info_span!("convert.image").entered();

        let image_data = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(vec![PageImage::decode(image_data)?])
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Image)
    }
}
