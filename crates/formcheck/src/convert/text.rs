use std::path::Path;

use crate::convert::pdf::rasterize_pdf;
use crate::convert::{DocumentFormat, PageConverter};
use crate::error::ProcessError;
use crate::page::PageImage;
use crate::typeset::{self, PdfLayout};

/// Plain-text documents are typeset to PDF and then rasterized.
pub struct TextConverter {
    dpi: u32,
}

impl TextConverter {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageConverter for TextConverter {
    fn convert(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        let _span = tracing::info_span!("convert.text").entered();

        let text = std::fs::read_to_string(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let pdf_bytes = typeset::render_text(&text, &PdfLayout::document())?;
        rasterize_pdf(&pdf_bytes, self.dpi)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_text_format() {
        let converter = TextConverter::new(300);
        assert!(converter.supports(DocumentFormat::Text));
        assert!(!converter.supports(DocumentFormat::Pdf));
        assert!(!converter.supports(DocumentFormat::Docx));
        assert!(!converter.supports(DocumentFormat::Image));
    }

    #[test]
    fn test_missing_text_file() {
        let result = TextConverter::new(300).convert(Path::new("/nonexistent/resume.txt"));
        assert!(matches!(result, Err(ProcessError::ReadDocument { .. })));
    }
}
