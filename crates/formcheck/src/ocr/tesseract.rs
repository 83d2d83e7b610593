use std::io::Cursor;
use std::sync::Arc;

use crate::error::ProcessError;
use crate::ocr::{TextRegionSource, Token};
use crate::page::PageImage;

/// Tesseract page-iterator level of a single word in TSV output.
const TSV_WORD_LEVEL: u32 = 5;

/// Number of columns in a Tesseract TSV row.
const TSV_COLUMNS: usize = 12;

/// Tesseract (via leptess) as a text-region source.
#[derive(Clone)]
pub struct TesseractSource {
    inner: Arc<TesseractSourceInner>,
}

struct TesseractSourceInner {
    languages: String,
    dpi: u32,
}

impl TesseractSource {
    pub fn new(languages: &[String], dpi: u32) -> Self {
        let lang_str = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };

        Self {
            inner: Arc::new(TesseractSourceInner {
                languages: lang_str,
                dpi,
            }),
        }
    }

    pub fn dpi(&self) -> u32 {
        self.inner.dpi
    }

    fn engine_for(&self, page: &PageImage) -> Result<leptess::LepTess, ProcessError> {
        // Re-encode as PNG so leptonica never sees a format it can't read.
        let img = image::load_from_memory(page.bytes())
            .map_err(|e| ProcessError::InvalidImage(format!("Failed to load image: {}", e)))?;

        let mut png_data = Vec::new();
        let mut cursor = Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(None, &self.inner.languages).map_err(|e| {
            ProcessError::OcrFailed(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;
        lt.set_source_resolution(self.inner.dpi as i32);

        Ok(lt)
    }
}

impl TextRegionSource for TesseractSource {
    fn extract(&self, page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        let _span = tracing::info_span!("ocr.extract").entered();

        let mut lt = self.engine_for(page)?;
        let tsv = lt
            .get_tsv_text(0)
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))?;

        let tokens = parse_tsv(&tsv);
        tracing::debug!(tokens = tokens.len(), "Recognized word tokens");
        Ok(tokens)
    }

    fn extract_text(&self, page: &PageImage) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("ocr.extract_text").entered();

        let mut lt = self.engine_for(page)?;
        lt.get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))
    }
}

/// Parses Tesseract TSV output into word tokens, preserving row order.
///
/// Header rows, non-word levels and malformed rows are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for line in tsv.lines() {
        let columns: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if columns.len() < TSV_COLUMNS {
            continue;
        }

        let Ok(level) = columns[0].trim().parse::<u32>() else {
            continue;
        };
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let geometry: Option<Vec<i32>> = columns[6..10]
            .iter()
            .map(|c| c.trim().parse::<i32>().ok())
            .collect();
        let Some(geometry) = geometry else {
            tracing::debug!(row = line, "Skipping TSV row with malformed geometry");
            continue;
        };

        tokens.push(Token::new(
            columns[11],
            geometry[0],
            geometry[1],
            geometry[2],
            geometry[3],
        ));
    }

    tokens
}
