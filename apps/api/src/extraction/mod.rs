//! Document text extraction — an ordered chain of strategies, fastest first.
//!
//! Flow: structured text layer (`pdf_text`) → OCR fallback (`ocr`) → quality gate.
//! A strategy's error is downgraded to "no text" while a later strategy remains;
//! the last strategy's error propagates to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

pub mod ocr;
pub mod pdf_text;
pub mod quality;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text layer could not be parsed: {0}")]
    Parse(String),

    #[error("OCR tooling unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to render document pages: {0}")]
    Render(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// True when the failure points at the uploaded document rather than the server.
    pub fn is_document_fault(&self) -> bool {
        matches!(
            self,
            ExtractError::Parse(_) | ExtractError::Render(_) | ExtractError::Recognition(_)
        )
    }
}

/// An uploaded document. Request-scoped, never persisted.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Bytes,
    pub file_name: String,
}

impl Document {
    pub fn new(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::sniff(&self.bytes)
    }
}

/// Container format, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Unknown,
}

impl DocumentKind {
    pub fn sniff(bytes: &[u8]) -> Self {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        const JPEG: &[u8] = b"\xff\xd8\xff";
        const TIFF_LE: &[u8] = b"II*\0";
        const TIFF_BE: &[u8] = b"MM\0*";

        // PDF readers accept the header anywhere in the first 1024 bytes.
        let head = &bytes[..bytes.len().min(1024)];
        if head.windows(5).any(|w| w == b"%PDF-") {
            DocumentKind::Pdf
        } else if [PNG, JPEG, TIFF_LE, TIFF_BE]
            .iter()
            .any(|magic| bytes.starts_with(magic))
        {
            DocumentKind::Image
        } else {
            DocumentKind::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    StructuredExtraction,
    OcrExtraction,
}

/// Text produced by exactly one strategy. `text` is always trimmed; an empty
/// string means no strategy produced anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub text: String,
    pub source: ExtractionSource,
}

/// A single extraction strategy. Implementations must release any handles
/// they allocate before returning, on both paths.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn source(&self) -> ExtractionSource;

    async fn extract(&self, document: &Document) -> Result<String, ExtractError>;
}

/// Ordered strategies, tried sequentially until one yields non-empty text.
/// Never runs two strategies concurrently.
#[derive(Clone)]
pub struct ExtractorChain {
    strategies: Vec<Arc<dyn TextExtractor>>,
}

impl ExtractorChain {
    pub fn new(strategies: Vec<Arc<dyn TextExtractor>>) -> Self {
        Self { strategies }
    }

    pub async fn extract(&self, document: &Document) -> Result<ExtractionResult, ExtractError> {
        let last = self.strategies.len().saturating_sub(1);
        let mut source = ExtractionSource::StructuredExtraction;

        for (idx, strategy) in self.strategies.iter().enumerate() {
            source = strategy.source();
            match strategy.extract(document).await {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        info!(
                            source = ?source,
                            chars = text.chars().count(),
                            "Extracted text from {}",
                            document.file_name
                        );
                        return Ok(ExtractionResult {
                            text: text.to_string(),
                            source,
                        });
                    }
                    info!(source = ?source, "Extractor produced no text");
                }
                Err(e) if idx < last => {
                    warn!(source = ?source, "Extractor failed, falling back: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ExtractionResult {
            text: String::new(),
            source,
        })
    }
}
