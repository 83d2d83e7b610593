//! Format conversion: turning an input document into rasterized pages.

pub mod docx;
pub mod image;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::config::UnknownFormatPolicy;
use crate::error::ProcessError;
use crate::page::PageImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
    Image,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" | "md" => Some(Self::Text),
            "png" | "jpg" | "jpeg" | "tiff" | "tif" | "bmp" | "gif" | "webp" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Turns a document on disk into an ordered sequence of raster pages.
pub trait FormatConverter: Send + Sync {
    fn to_page_images(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError>;
}

/// Converter for a single document format.
pub trait PageConverter: Send + Sync {
    fn convert(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}

pub struct ConverterRegistry {
    converters: Vec<Box<dyn PageConverter>>,
    unknown_format: UnknownFormatPolicy,
}

impl ConverterRegistry {
    pub fn new(dpi: u32, unknown_format: UnknownFormatPolicy) -> Self {
        let converters: Vec<Box<dyn PageConverter>> = vec![
            Box::new(image::ImageConverter::new()),
            Box::new(pdf::PdfConverter::new(dpi)),
            Box::new(text::TextConverter::new(dpi)),
            Box::new(docx::DocxConverter::new(dpi)),
        ];

        Self {
            converters,
            unknown_format,
        }
    }

    fn resolve_format(&self, path: &Path) -> Result<DocumentFormat, ProcessError> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match DocumentFormat::from_extension(extension) {
            Some(format) => Ok(format),
            None => match self.unknown_format {
                UnknownFormatPolicy::Passthrough => {
                    tracing::warn!(
                        extension,
                        "Unknown document extension, treating the file as an image"
                    );
                    Ok(DocumentFormat::Image)
                }
                UnknownFormatPolicy::Reject => {
                    Err(ProcessError::UnsupportedFormat(extension.to_string()))
                }
            },
        }
    }
}

impl FormatConverter for ConverterRegistry {
    fn to_page_images(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        let format = self.resolve_format(path)?;

        for converter in &self.converters {
            if converter.supports(format) {
                let pages = converter.convert(path)?;
                tracing::debug!(?format, pages = pages.len(), "Converted document to pages");
                return Ok(pages);
            }
        }

        Err(ProcessError::UnsupportedFormat(format!("{:?}", format)))
    }
}
