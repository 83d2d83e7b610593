pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod ocr;
pub mod page;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod typeset;

pub use config::{load_config, load_config_from_str, Config, VerificationMode};
pub use convert::{ConverterRegistry, DocumentFormat, FormatConverter};
pub use error::{
    ConfigError, DocumentRole, ErrorKind, FormcheckError, ProcessError, Result, VerifyError,
};
pub use extract::{FieldExtractor, FieldMap, HeadingExtractor, HeadingMap, NormalizedField};
pub use matcher::{ContextMatcher, FieldResult, HeadingResult, MatchStatus, PositionalMatcher};
pub use ocr::{TesseractSource, TextRegionSource, TimedSource, Token};
pub use page::{PageImage, PageSize};
pub use pipeline::{VerificationContext, VerificationRequest, Verifier, VerifierConfig};
pub use report::{render_report_pdf, ReportSummary, VerificationReport};
