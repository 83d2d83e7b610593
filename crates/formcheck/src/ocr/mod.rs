//! Text-region sources: OCR engines that turn a page into recognized text.

pub mod tesseract;

use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use serde::{Deserialize, Serialize};

use crate::error::ProcessError;
use crate::page::PageImage;

pub use tesseract::TesseractSource;

/// A recognized piece of text and its bounding box in page pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Token {
    pub fn new(text: impl Into<String>, left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            width,
            height,
        }
    }
}

pub trait TextRegionSource: Send + Sync {
    /// Recognized tokens with bounding boxes, in reading order.
    fn extract(&self, page: &PageImage) -> Result<Vec<Token>, ProcessError>;

    /// Unstructured recognized text of the whole page.
    fn extract_text(&self, page: &PageImage) -> Result<String, ProcessError>;
}

impl<S: TextRegionSource + ?Sized> TextRegionSource for Box<S> {
    fn extract(&self, page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        (**self).extract(page)
    }

    fn extract_text(&self, page: &PageImage) -> Result<String, ProcessError> {
        (**self).extract_text(page)
    }
}

/// Bounds every call of the wrapped source by a wall-clock timeout.
///
/// The call runs on a helper thread; on expiry the thread is abandoned and
/// its eventual result discarded.
#[derive(Clone)]
pub struct TimedSource<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimedSource<S>
where
    S: TextRegionSource + Clone + 'static,
{
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn run<T, F>(&self, operation: &str, call: F) -> Result<T, ProcessError>
    where
        T: Send + 'static,
        F: FnOnce(S) -> Result<T, ProcessError> + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = self.inner.clone();

        std::thread::Builder::new()
            .name("formcheck-ocr".to_string())
            .spawn(move || {
                // Receiver may already be gone after a timeout.
                let _ = tx.send(call(inner));
            })
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to spawn OCR thread: {}", e)))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    operation,
                    timeout_secs = self.timeout.as_secs(),
                    "Text-region source timed out"
                );
                Err(ProcessError::Timeout {
                    operation: operation.to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(ProcessError::OcrFailed(format!(
                "{} worker exited without a result",
                operation
            ))),
        }
    }
}

impl<S> TextRegionSource for TimedSource<S>
where
    S: TextRegionSource + Clone + 'static,
{
    fn extract(&self, page: &PageImage) -> Result<Vec<Token>, ProcessError> {
        let page = page.clone();
        self.run("OCR token extraction", move |source| source.extract(&page))
    }

    fn extract_text(&self, page: &PageImage) -> Result<String, ProcessError> {
        let page = page.clone();
        self.run("OCR text extraction", move |source| {
            source.extract_text(&page)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct SlowSource {
        delay: Duration,
    }

    impl TextRegionSource for SlowSource {
        fn extract(&self, _page: &PageImage) -> Result<Vec<Token>, ProcessError> {
            std::thread::sleep(self.delay);
            Ok(vec![Token::new("Name", 1, 2, 3, 4)])
        }

        fn extract_text(&self, _page: &PageImage) -> Result<String, ProcessError> {
            std::thread::sleep(self.delay);
            Ok("EDUCATION".to_string())
        }
    }

    #[derive(Clone)]
    struct FailingSource;

    impl TextRegionSource for FailingSource {
        fn extract(&self, _page: &PageImage) -> Result<Vec<Token>, ProcessError> {
            Err(ProcessError::OcrFailed("engine missing".to_string()))
        }

        fn extract_text(&self, _page: &PageImage) -> Result<String, ProcessError> {
            Err(ProcessError::OcrFailed("engine missing".to_string()))
        }
    }

    fn page() -> PageImage {
        PageImage::new(vec![0u8; 4], 10, 10)
    }

    #[test]
    fn test_timed_source_passes_through_fast_results() {
        let source = TimedSource::new(
            SlowSource {
                delay: Duration::from_millis(0),
            },
            Duration::from_secs(5),
        );

        let tokens = source.extract(&page()).unwrap();
        assert_eq!(tokens, vec![Token::new("Name", 1, 2, 3, 4)]);
        assert_eq!(source.extract_text(&page()).unwrap(), "EDUCATION");
    }

    #[test]
    fn test_timed_source_times_out() {
        let source = TimedSource::new(
            SlowSource {
                delay: Duration::from_millis(500),
            },
            Duration::from_millis(20),
        );

        match source.extract(&page()) {
            Err(ProcessError::Timeout { operation, .. }) => {
                assert_eq!(operation, "OCR token extraction");
            }
            other => panic!("Expected Timeout error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_timed_source_propagates_errors() {
        let source = TimedSource::new(FailingSource, Duration::from_secs(5));
        assert!(matches!(
            source.extract_text(&page()),
            Err(ProcessError::OcrFailed(_))
        ));
    }

    #[test]
    fn test_boxed_source_delegates() {
        let source: Box<dyn TextRegionSource> = Box::new(SlowSource {
            delay: Duration::from_millis(0),
        });
        assert_eq!(source.extract(&page()).unwrap().len(), 1);
    }
}
