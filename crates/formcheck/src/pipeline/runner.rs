use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::config::VerificationMode;
use crate::convert::{ConverterRegistry, FormatConverter};
use crate::error::{DocumentRole, Result, VerifyError};
use crate::extract::{FieldExtractor, FieldMap, HeadingExtractor, HeadingMap};
use crate::matcher::{ContextMatcher, FieldResult, HeadingResult, PositionalMatcher};
use crate::ocr::{TesseractSource, TextRegionSource, TimedSource};
use crate::page::PageImage;
use crate::report::VerificationReport;
use crate::sanitize;

use super::config::VerifierConfig;
use super::context::{VerificationContext, VerificationRequest};

pub struct Verifier {
    config: Arc<VerifierConfig>,
    converter: Box<dyn FormatConverter>,
    source: Box<dyn TextRegionSource>,
    fields: FieldExtractor,
    headings: HeadingExtractor,
    positional: PositionalMatcher,
    context: ContextMatcher,
}

impl Verifier {
    /// Production constructor: pdftoppm-backed conversion and Tesseract OCR.
    pub fn from_config(config: Arc<VerifierConfig>) -> Self {
        let converter = ConverterRegistry::new(config.ocr_dpi, config.unknown_format);
        let tesseract = TesseractSource::new(&config.ocr_languages, config.ocr_dpi);
        let source: Box<dyn TextRegionSource> = match config.ocr_timeout {
            Some(timeout) => Box::new(TimedSource::new(tesseract, timeout)),
            None => Box::new(tesseract),
        };

        Self::new(config, Box::new(converter), source)
    }

    /// Builds a verifier around the given collaborators.
    pub fn new(
        config: Arc<VerifierConfig>,
        converter: Box<dyn FormatConverter>,
        source: Box<dyn TextRegionSource>,
    ) -> Self {
        let fields = FieldExtractor::new(&config.keywords);
        let headings = HeadingExtractor::new(&config.headings);
        let positional = PositionalMatcher::new(config.tolerance_px);

        Self {
            config,
            converter,
            source,
            fields,
            headings,
            positional,
            context: ContextMatcher::new(),
        }
    }

    pub fn mode(&self) -> VerificationMode {
        self.config.mode
    }

    /// Converts both documents and compares them in the configured mode.
    pub fn verify(&self, request: &VerificationRequest) -> Result<VerificationReport> {
        let template = request
            .template
            .as_deref()
            .ok_or(VerifyError::MissingDocument(DocumentRole::Template))?;
        let candidate = request
            .candidate
            .as_deref()
            .ok_or(VerifyError::MissingDocument(DocumentRole::Candidate))?;

        let _span = info_span!("verify",
            mode = %self.config.mode,
            template = %sanitize::redact_path(template),
            candidate = %sanitize::redact_path(candidate),
        )
        .entered();

        let (template_pages, candidate_pages) = {
            let _step = info_span!("convert_documents").entered();
            (
                self.load_pages(template, DocumentRole::Template)?,
                self.load_pages(candidate, DocumentRole::Candidate)?,
            )
        };

        let mut ctx = VerificationContext::new(template_pages, candidate_pages);
        let report = self.run(&mut ctx)?;

        info!(
            results = report.len(),
            matched = report.summary().matched,
            accuracy = report.summary().accuracy,
            "Verification complete"
        );
        Ok(report)
    }

    /// Runs the mode-specific steps over the pages held by `ctx`, leaving the
    /// intermediate maps behind for inspection.
    pub fn run(&self, ctx: &mut VerificationContext) -> Result<VerificationReport> {
        match self.config.mode {
            VerificationMode::Fields => {
                let field_map = {
                    let _step = info_span!("extract_fields").entered();
                    self.step_extract_fields(ctx)?
                };
                let results = {
                    let _step = info_span!("match_fields").entered();
                    self.step_match_fields(ctx, &field_map)?
                };
                ctx.field_map = Some(field_map);
                Ok(VerificationReport::from_fields(results))
            }
            VerificationMode::Headings => {
                let (template_headings, candidate_headings) = {
                    let _step = info_span!("extract_headings").entered();
                    (
                        self.headings_for(&ctx.template_pages)?,
                        self.headings_for(&ctx.candidate_pages)?,
                    )
                };
                let results = {
                    let _step = info_span!("compare_contexts").entered();
                    self.step_compare_contexts(&template_headings, &candidate_headings)
                };
                ctx.template_headings = Some(template_headings);
                ctx.candidate_headings = Some(candidate_headings);
                Ok(VerificationReport::from_headings(results))
            }
        }
    }

    /// Field map of a template's first page.
    pub fn field_map(&self, template: &Path) -> Result<FieldMap> {
        let _span = info_span!("field_map", template = %sanitize::redact_path(template))
            .entered();

        let pages = self.load_pages(template, DocumentRole::Template)?;
        let ctx = VerificationContext::new(pages, Vec::new());
        self.step_extract_fields(&ctx)
    }

    fn load_pages(&self, path: &Path, role: DocumentRole) -> Result<Vec<PageImage>> {
        let pages = self.converter.to_page_images(path)?;
        check_pages(&pages, role)?;
        debug!(role = %role, pages = pages.len(), "Converted document");
        Ok(pages)
    }

    fn step_extract_fields(&self, ctx: &VerificationContext) -> Result<FieldMap> {
        let page = first_page(&ctx.template_pages, DocumentRole::Template)?;
        if ctx.template_pages.len() > 1 {
            debug!(
                ignored = ctx.template_pages.len() - 1,
                "Only the first template page is mapped"
            );
        }

        let tokens = self.source.extract(page)?;
        Ok(self.fields.extract(&tokens, page.size()?))
    }

    fn step_match_fields(
        &self,
        ctx: &VerificationContext,
        field_map: &FieldMap,
    ) -> Result<Vec<FieldResult>> {
        let page = first_page(&ctx.candidate_pages, DocumentRole::Candidate)?;
        let tokens = self.source.extract(page)?;
        Ok(self
            .positional
            .match_fields(field_map, &tokens, page.size()?))
    }

    fn headings_for(&self, pages: &[PageImage]) -> Result<HeadingMap> {
        let texts = pages
            .iter()
            .map(|page| self.source.extract_text(page))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.headings.extract(&texts.join("\n")))
    }

    fn step_compare_contexts(
        &self,
        template: &HeadingMap,
        candidate: &HeadingMap,
    ) -> Vec<HeadingResult> {
        self.context.compare(template, candidate)
    }
}

fn first_page(pages: &[PageImage], role: DocumentRole) -> Result<&PageImage> {
    Ok(pages.first().ok_or(VerifyError::EmptyDocument(role))?)
}

/// Rejects empty documents and zero-area pages before any OCR runs.
fn check_pages(pages: &[PageImage], role: DocumentRole) -> Result<()> {
    if pages.is_empty() {
        return Err(VerifyError::EmptyDocument(role).into());
    }
    for page in pages {
        page.size()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{ErrorKind, FormcheckError, ProcessError};
    use crate::matcher::MatchStatus;
    use crate::ocr::Token;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Pages are keyed by path; each page's bytes name the OCR fixture.
    struct FakeConverter {
        documents: HashMap<PathBuf, Vec<PageImage>>,
    }

    impl FormatConverter for FakeConverter {
        fn to_page_images(&self, path: &Path) -> std::result::Result<Vec<PageImage>, ProcessError> {
            self.documents
                .get(path)
                .cloned()
                .ok_or_else(|| ProcessError::UnsupportedFormat(path.display().to_string()))
        }
    }

    #[derive(Default)]
    struct FakeSource {
        tokens: HashMap<Vec<u8>, Vec<Token>>,
        text: HashMap<Vec<u8>, String>,
    }

    impl TextRegionSource for FakeSource {
        fn extract(&self, page: &PageImage) -> std::result::Result<Vec<Token>, ProcessError> {
            Ok(self.tokens.get(page.bytes()).cloned().unwrap_or_default())
        }

        fn extract_text(&self, page: &PageImage) -> std::result::Result<String, ProcessError> {
            Ok(self.text.get(page.bytes()).cloned().unwrap_or_default())
        }
    }

    fn page(key: &str, width: u32, height: u32) -> PageImage {
        PageImage::new(key.as_bytes().to_vec(), width, height)
    }

    fn verifier(mode: VerificationMode, source: FakeSource) -> Verifier {
        let mut config = Config::default();
        config.mode = mode;
        let converter = FakeConverter {
            documents: HashMap::from([
                (PathBuf::from("template.png"), vec![page("template", 800, 600)]),
                (PathBuf::from("resume.png"), vec![page("resume", 800, 600)]),
                (
                    PathBuf::from("resume-2p.png"),
                    vec![page("resume", 800, 600), page("resume-p2", 800, 600)],
                ),
                (PathBuf::from("empty.png"), Vec::new()),
                (PathBuf::from("flat.png"), vec![page("flat", 800, 0)]),
            ]),
        };
        Verifier::new(
            Arc::new(VerifierConfig::from_config(&config)),
            Box::new(converter),
            Box::new(source),
        )
    }

    fn field_source() -> FakeSource {
        let mut source = FakeSource::default();
        source.tokens.insert(
            b"template".to_vec(),
            vec![
                Token::new("Name", 400, 300, 40, 12),
                Token::new("Email", 80, 60, 50, 12),
                Token::new("Jane", 460, 300, 40, 12),
            ],
        );
        source.tokens.insert(
            b"resume".to_vec(),
            vec![
                Token::new("name", 410, 315, 40, 12),
                Token::new("Email", 200, 60, 50, 12),
            ],
        );
        source
    }

    #[test]
    fn test_fields_mode_end_to_end() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let report = verifier
            .verify(&VerificationRequest::new("template.png", "resume.png"))
            .unwrap();

        let VerificationReport::Fields { results, summary } = report else {
            panic!("Expected fields report");
        };
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "Name");
        assert!(results[0].matched);
        assert_eq!(results[0].expected_position, [400, 300]);
        assert_eq!(results[1].text, "Email");
        assert!(!results[1].matched);
        assert_eq!(summary.accuracy, 50.0);
    }

    #[test]
    fn test_field_map_uses_first_template_page() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let map = verifier.field_map(Path::new("template.png")).unwrap();

        let labels: Vec<&str> = map.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Name", "Email"]);
        assert_eq!((map.fields[0].x, map.fields[0].y), (50, 50));
    }

    #[test]
    fn test_headings_mode_joins_all_pages() {
        let mut source = FakeSource::default();
        source.text.insert(
            b"template".to_vec(),
            "EDUCATION\nBSc Computer Science 2020\nSKILLS\nrust".to_string(),
        );
        source
            .text
            .insert(b"resume".to_vec(), "EDUCATION\nBSc Computer Science 2021".to_string());
        source
            .text
            .insert(b"resume-p2".to_vec(), "SKILLS\nrust".to_string());

        let verifier = verifier(VerificationMode::Headings, source);
        let template = vec![page("template", 800, 600)];
        let candidate = vec![page("resume", 800, 600), page("resume-p2", 800, 600)];
        let mut ctx = VerificationContext::new(template, candidate);
        let report = verifier.run(&mut ctx).unwrap();

        let VerificationReport::Headings { results, .. } = report else {
            panic!("Expected headings report");
        };
        let statuses: Vec<MatchStatus> = results.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![MatchStatus::Mismatch, MatchStatus::Match]);
        assert_eq!(results[0].accuracy, 75.0);
        assert_eq!(ctx.candidate_headings.map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_missing_document_is_invalid_input() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let request = VerificationRequest {
            template: Some(PathBuf::from("template.png")),
            candidate: None,
        };

        let err = verifier.verify(&request).unwrap_err();
        assert!(matches!(
            err,
            FormcheckError::Verify(VerifyError::MissingDocument(DocumentRole::Candidate))
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_empty_document_rejected_before_ocr() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let err = verifier
            .verify(&VerificationRequest::new("empty.png", "resume.png"))
            .unwrap_err();
        assert!(matches!(
            err,
            FormcheckError::Verify(VerifyError::EmptyDocument(DocumentRole::Template))
        ));
    }

    #[test]
    fn test_zero_area_page_is_degenerate_geometry() {
        let source = field_source();
        let verifier = verifier(VerificationMode::Fields, source);
        let err = verifier
            .verify(&VerificationRequest::new("template.png", "flat.png"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    }

    #[test]
    fn test_converter_failure_propagates() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let err = verifier
            .verify(&VerificationRequest::new("template.png", "unknown.xyz"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_fields_mode_ignores_extra_candidate_pages() {
        let verifier = verifier(VerificationMode::Fields, field_source());
        let single = verifier
            .verify(&VerificationRequest::new("template.png", "resume.png"))
            .unwrap();
        let multi = verifier
            .verify(&VerificationRequest::new("template.png", "resume-2p.png"))
            .unwrap();
        assert_eq!(single, multi);
    }
}
