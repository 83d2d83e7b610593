use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

use crate::convert::pdf::rasterize_pdf;
use crate::convert::{DocumentFormat, PageConverter};
use crate::error::ProcessError;
use crate::page::PageImage;
use crate::typeset::{self, PdfLayout};

const DOCUMENT_PART: &str = "word/document.xml";

/// DOCX paragraphs are typeset to PDF and then rasterized.
pub struct DocxConverter {
    dpi: u32,
}

impl DocxConverter {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageConverter for DocxConverter {
    fn convert(&self, path: &Path) -> Result<Vec<PageImage>, ProcessError> {
        let _span = tracing::info_span!("convert.docx").entered();

        let file = std::fs::File::open(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| ProcessError::DocxProcessing(format!("Not a DOCX archive: {}", e)))?;

        let text = parse_docx_xml(&read_document_part(&mut archive)?)?;
        tracing::debug!(paragraphs = text.lines().count(), "Extracted DOCX text");

        let pdf_bytes = typeset::render_text(&text, &PdfLayout::document())?;
        rasterize_pdf(&pdf_bytes, self.dpi)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Docx
    }
}

fn read_document_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<String, ProcessError> {
    let part = archive.by_name(DOCUMENT_PART).map_err(|e| {
        ProcessError::DocxProcessing(format!("Missing {}: {}", DOCUMENT_PART, e))
    })?;

    std::io::read_to_string(part)
        .map_err(|e| ProcessError::DocxProcessing(format!("Unreadable {}: {}", DOCUMENT_PART, e)))
}

/// One line per `w:p`. Run text is concatenated as written; `w:tab` becomes
/// a tab and `w:br` a line break inside the paragraph.
fn parse_docx_xml(xml: &str) -> Result<String, ProcessError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_run_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ProcessError::DocxProcessing(format!("Malformed {}: {}", DOCUMENT_PART, e)))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_run_text = true,
                _ => {}
            },
            Event::Empty(e) => match (e.local_name().as_ref(), current.as_mut()) {
                (b"p", None) => paragraphs.push(String::new()),
                (b"tab", Some(paragraph)) => paragraph.push('\t'),
                (b"br" | b"cr", Some(paragraph)) => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_run_text => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) if in_run_text => {
                if let Some(paragraph) = current.as_mut() {
                    push_reference(paragraph, &e)?;
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph.trim_end().to_string());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Appends the text an `&...;` reference stands for. Unknown named entities
/// are dropped.
fn push_reference(paragraph: &mut String, reference: &BytesRef<'_>) -> Result<(), ProcessError> {
    let resolved = reference.resolve_char_ref().map_err(|e| {
        ProcessError::DocxProcessing(format!("Bad character reference in {}: {}", DOCUMENT_PART, e))
    })?;

    match resolved {
        Some(c) => paragraph.push(c),
        None => {
            let name = String::from_utf8_lossy(reference);
            match resolve_predefined_entity(&name) {
                Some(text) => paragraph.push_str(text),
                None => tracing::debug!(entity = %name, "Dropping unknown entity"),
            }
        }
    }

    Ok(())
}
