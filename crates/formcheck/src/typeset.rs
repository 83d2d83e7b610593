//! Minimal paginated text-to-PDF writer built on lopdf.

use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ProcessError;

/// US Letter in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: i64 = 50;
const FIRST_BASELINE: i64 = 742;

#[derive(Debug, Clone, Copy)]
pub struct PdfLayout {
    pub base_font: &'static str,
    pub font_size: u32,
    pub leading: u32,
    pub lines_per_page: usize,
    /// Longer lines are wrapped at word boundaries.
    pub max_line_chars: usize,
}

impl PdfLayout {
    /// Layout used when typesetting plain-text and DOCX documents for OCR.
    pub fn document() -> Self {
        Self {
            base_font: "Helvetica",
            font_size: 11,
            leading: 14,
            lines_per_page: 50,
            max_line_chars: 95,
        }
    }

    /// Layout used for exported verification reports.
    pub fn report() -> Self {
        Self {
            base_font: "Helvetica",
            font_size: 10,
            leading: 13,
            lines_per_page: 54,
            max_line_chars: 100,
        }
    }
}

/// Typesets `text` line by line into a paginated PDF.
pub fn render_text(text: &str, layout: &PdfLayout) -> Result<Vec<u8>, ProcessError> {
    let lines: Vec<String> = text
        .lines()
        .flat_map(|line| wrap_line(line, layout.max_line_chars))
        .collect();
    render_lines(&lines, layout)
}

pub fn render_lines(lines: &[String], layout: &PdfLayout) -> Result<Vec<u8>, ProcessError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => layout.base_font,
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut chunks: Vec<&[String]> = lines.chunks(layout.lines_per_page.max(1)).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let kids: Vec<Object> = chunks
        .into_iter()
        .map(|chunk| {
            let content = page_content(chunk, layout);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ProcessError::PdfProcessing(format!("Failed to write PDF: {}", e)))?;
    Ok(buffer)
}

/// Text object for one page: font, leading and start position, then one
/// `Tj T*` per line.
fn page_content(lines: &[String], layout: &PdfLayout) -> String {
    let mut content = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        layout.font_size, layout.leading, MARGIN_LEFT, FIRST_BASELINE
    );
    for line in lines {
        content.push('(');
        push_escaped(&mut content, line);
        content.push_str(") Tj T*\n");
    }
    content.push_str("ET\n");
    content
}

/// Splits `line` at word boundaries so no piece exceeds `max_chars`
/// characters, unless a single word is longer than that.
pub fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || line.chars().count() <= max_chars {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }

    wrapped
}

/// Writes `text` as a WinAnsi string literal body. Latin-1 and the common
/// typographic punctuation become octal escapes; other characters become
/// spaces.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match win_ansi_code(c) {
                Some(code) => out.push_str(&format!("\\{:03o}", code)),
                None => out.push(' '),
            },
        }
    }
}

fn win_ansi_code(c: char) -> Option<u8> {
    match c {
        '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).ok(),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2026}' => Some(0x85),
        '\u{20ac}' => Some(0x80),
        _ => None,
    }
}
