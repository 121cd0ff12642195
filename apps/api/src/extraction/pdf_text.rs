//! Structured extractor — reads the PDF's embedded text layer via `pdf-extract`.

use async_trait::async_trait;
use tracing::debug;

use crate::extraction::{Document, DocumentKind, ExtractError, ExtractionSource, TextExtractor};

pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::StructuredExtraction
    }

    async fn extract(&self, document: &Document) -> Result<String, ExtractError> {
        if document.kind() != DocumentKind::Pdf {
            return Err(ExtractError::Parse("document is not a PDF".to_string()));
        }

        let bytes = document.bytes.clone();
        // Parser is CPU-bound and may panic on malformed input; the handle is
        // dropped inside the blocking task either way.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractError::Parse(format!("parser aborted: {e}")))?
            .map_err(|e| ExtractError::Parse(format!("{e:?}")))?;

        let text = text.trim().to_string();
        debug!(chars = text.chars().count(), "Structured extraction finished");
        Ok(text)
    }
}
