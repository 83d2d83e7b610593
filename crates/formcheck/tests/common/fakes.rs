//! In-memory stand-ins for the OCR engine and the format converter.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use formcheck::{FormatConverter, PageImage, ProcessError, TextRegionSource, Token};

/// Serves pre-built pages for known paths.
#[derive(Default)]
pub struct FakeConverter {
    documents: HashMap<PathBuf, Vec<PageImage>>,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, pages: Vec<PageImage>) -> Self {
        self.documents.insert(PathBuf::from(path), pages);
        self
    }
}

impl FormatConverter for FakeConverter {
    fn to_page_images(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| ProcessError::ReadDocument {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such fixture"),
            })
    }
}

/// Scripted OCR output, looked up by page bytes first and page size second.
#[derive(Default)]
pub struct FakeSource {
    tokens_by_bytes: HashMap<Vec<u8>, Vec<Token>>,
    tokens_by_size: HashMap<(u32, u32), Vec<Token>>,
    text_by_bytes: HashMap<Vec<u8>, String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(mut self, page_key: &str, tokens: Vec<Token>) -> Self {
        self.tokens_by_bytes
            .insert(page_key.as_bytes().to_vec(), tokens);
        self
    }

    pub fn with_tokens_for_size(mut self, width: u32, height: u32, tokens: Vec<Token>) -> Self {
        self.tokens_by_size.insert((width, height), tokens);
        self
    }

    pub fn with_text(mut self, page_key: &str, text: &str) -> Self {
        self.text_by_bytes
            .insert(page_key.as_bytes().to_vec(), text.to_string());
        self
    }
}

impl TextRegionSource for FakeSource {
    fn extract(&self, page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        let tokens = self
            .tokens_by_bytes
            .get(page.bytes())
            .or_else(|| self.tokens_by_size.get(&(page.width(), page.height())));
        Ok(tokens.cloned().unwrap_or_default())
    }

    fn extract_text(&self, page: &PageImage) -> Result<String, ProcessError> {
        Ok(self
            .text_by_bytes
            .get(page.bytes())
            .cloned()
            .unwrap_or_default())
    }
}

/// Never answers within any reasonable timeout.
#[derive(Clone)]
pub struct StallingSource {
    pub delay: Duration,
}

impl TextRegionSource for StallingSource {
    fn extract(&self, _page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        thread::sleep(self.delay);
        Ok(Vec::new())
    }

    fn extract_text(&self, _page: &PageImage) -> Result<String, ProcessError> {
        thread::sleep(self.delay);
        Ok(String::new())
    }
}

/// Always fails, as a broken OCR install would.
pub struct BrokenSource;

impl TextRegionSource for BrokenSource {
    fn extract(&self, _page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        Err(ProcessError::OcrFailed("tesseract not installed".to_string()))
    }

    fn extract_text(&self, _page: &PageImage) -> Result<String, ProcessError> {
        Err(ProcessError::OcrFailed("tesseract not installed".to_string()))
    }
}

/// A page whose bytes double as the OCR lookup key.
pub fn page(key: &str, width: u32, height: u32) -> PageImage {
    PageImage::new(key.as_bytes().to_vec(), width, height)
}
