use std::path::{Path, PathBuf};
use std::process::Command;

use crate::convert::{DocumentFormat, PageConverter};
use crate::error::ProcessError;
use crate::page::PageImage;

/// Prefix pdftoppm uses for rendered page files.
const PAGE_PREFIX: &str = "page";

pub struct PdfConverter {
    dpi: u32,
}

impl PdfConverter {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageConverter for PdfConverter {
    fn convert(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        let _span = tracing::info_span!("convert.pdf").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        rasterize_pdf(&pdf_bytes, self.dpi)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Pdf)
    }
}

/// Renders every page of a PDF to PNG with pdftoppm (poppler-utils).
pub fn rasterize_pdf(pdf_bytes: &[u8], dpi: u32) -> Result<Vec<PageImage>, ProcessError> {
    // lopdf is stricter than poppler, so a parse failure is not fatal here.
    let expected_pages = match lopdf::Document::load_mem(pdf_bytes) {
        Ok(doc) => Some(doc.get_pages().len()),
        Err(e) => {
            tracing::warn!("lopdf failed to parse PDF: {}. Relying on pdftoppm.", e);
            None
        }
    };

    let work_dir = std::env::temp_dir().join(format!("formcheck_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&work_dir).map_err(|e| {
        ProcessError::PdfProcessing(format!("Failed to create temp directory: {}", e))
    })?;

    let result = render_pages(pdf_bytes, dpi, &work_dir);
    let _ = std::fs::remove_dir_all(&work_dir);
    let pages = result?;

    if let Some(expected) = expected_pages {
        if expected != pages.len() {
            tracing::warn!(
                expected,
                rendered = pages.len(),
                "pdftoppm rendered a different number of pages than the PDF declares"
            );
        }
    }

    Ok(pages)
}

fn render_pages(pdf_bytes: &[u8], dpi: u32, work_dir: &Path) -> Result<Vec<PageImage>, ProcessError> {
    let pdf_path = work_dir.join("input.pdf");
    std::fs::write(&pdf_path, pdf_bytes)
        .map_err(|e| ProcessError::PdfProcessing(format!("Failed to write temp PDF: {}", e)))?;

    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(&pdf_path)
        .arg(work_dir.join(PAGE_PREFIX))
        .output()
        .map_err(|e| {
            ProcessError::PdfProcessing(format!(
                "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                e
            ))
        })?;

    if !output.status.success() {
        return Err(ProcessError::PdfProcessing(format!(
            "pdftoppm failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let mut rendered = collect_rendered_pages(work_dir)?;
    rendered.sort_by_key(|(page_num, _)| *page_num);

    rendered
        .into_iter()
        .map(|(_, image_path)| {
            let data = std::fs::read(&image_path).map_err(|e| {
                ProcessError::PdfProcessing(format!("Failed to read rendered image: {}", e))
            })?;
            PageImage::decode(data)
        })
        .collect()
}

/// Finds `page-N.png` files (pdftoppm zero-pads N depending on page count).
fn collect_rendered_pages(work_dir: &Path) -> Result<Vec<(u32, PathBuf)>, ProcessError> {
    let entries = std::fs::read_dir(work_dir).map_err(|e| {
        ProcessError::PdfProcessing(format!("Failed to list rendered pages: {}", e))
    })?;

    let mut pages = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(page_num) = parse_page_number(name) {
            pages.push((page_num, path));
        }
    }

    Ok(pages)
}

fn parse_page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_pdf_format() {
        let converter = PdfConverter::new(300);
        assert!(converter.supports(DocumentFormat::Pdf));
        assert!(!converter.supports(DocumentFormat::Image));
        assert!(!converter.supports(DocumentFormat::Text));
        assert!(!converter.supports(DocumentFormat::Docx));
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number("page-1.png"), Some(1));
        assert_eq!(parse_page_number("page-07.png"), Some(7));
        assert_eq!(parse_page_number("page-123.png"), Some(123));
        assert_eq!(parse_page_number("input.pdf"), None);
        assert_eq!(parse_page_number("page-x.png"), None);
    }

    #[test]
    fn test_collect_rendered_pages_sorts_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-1.png", "input.pdf"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let mut pages = collect_rendered_pages(dir.path()).unwrap();
        pages.sort_by_key(|(n, _)| *n);
        let numbers: Vec<u32> = pages.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn test_pdf_file_not_found_error() {
        let converter = PdfConverter::new(300);
        match converter.convert(Path::new("/nonexistent/file.pdf")) {
            Err(ProcessError::ReadDocument { path, .. }) => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/file.pdf");
            }
            _ => panic!("Expected ReadDocument error"),
        }
    }
}
