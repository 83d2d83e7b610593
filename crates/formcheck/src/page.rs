//! Rasterized pages exchanged between the format converter and the OCR source.

use std::sync::Arc;

use image::GenericImageView;

use crate::error::{ProcessError, VerifyError};

/// Pixel dimensions of a page. Both dimensions are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    width: u32,
    height: u32,
}

impl PageSize {
    pub fn new(width: u32, height: u32) -> Result<Self, VerifyError> {
        if width == 0 || height == 0 {
            return Err(VerifyError::DegenerateGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// One encoded raster page plus its pixel dimensions.
#[derive(Clone)]
pub struct PageImage {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl PageImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            width,
            height,
        }
    }

    /// Decodes just enough of `bytes` to learn the page dimensions.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, ProcessError> {
        let img = image::load_from_memory(&bytes)
            .map_err(|e| ProcessError::InvalidImage(e.to_string()))?;
        let (width, height) = img.dimensions();
        Ok(Self::new(bytes, width, height))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Result<PageSize, VerifyError> {
        PageSize::new(self.width, self.height)
    }
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("bytes_len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
