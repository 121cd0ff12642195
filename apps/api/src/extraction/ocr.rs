//! OCR extractor — Tesseract fallback for documents without a usable text layer.
//!
//! PDFs are rasterized with `pdftoppm` (poppler-utils) into a scratch directory,
//! then each page image is recognised with `tesseract`. Image uploads go to
//! Tesseract directly. This is the slowest stage of the pipeline by far; it is
//! only reached after the structured extractor came back empty.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::extraction::{Document, DocumentKind, ExtractError, ExtractionSource, TextExtractor};

pub struct TesseractOcr {
    lang: String,
    dpi: u32,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>, dpi: u32) -> Self {
        Self {
            lang: lang.into(),
            dpi,
        }
    }

    /// Renders every PDF page to PNG inside `workdir`, returning page images in order.
    async fn rasterize(&self, pdf: &Path, workdir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        let prefix = workdir.join("page");
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(&prefix)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractError::Unavailable(format!("failed to run pdftoppm: {e}")))?;

        if !output.status.success() {
            return Err(ExtractError::Render(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut entries = tokio::fs::read_dir(workdir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            files.push(entry.path());
        }

        let pages = page_images(files);
        if pages.is_empty() {
            return Err(ExtractError::Render("pdftoppm produced no pages".to_string()));
        }
        Ok(pages)
    }

    async fn recognize(&self, image: &Path) -> Result<String, ExtractError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractError::Unavailable(format!("failed to run tesseract: {e}")))?;

        if !output.status.success() {
            return Err(ExtractError::Recognition(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextExtractor for TesseractOcr {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::OcrExtraction
    }

    async fn extract(&self, document: &Document) -> Result<String, ExtractError> {
        let kind = document.kind();
        if kind == DocumentKind::Unknown {
            return Err(ExtractError::Recognition(
                "unsupported document format; expected a PDF or image".to_string(),
            ));
        }

        require_tool("tesseract", "--version").await?;
        if kind == DocumentKind::Pdf {
            require_tool("pdftoppm", "-v").await?;
        }

        info!(lang = %self.lang, dpi = self.dpi, "Attempting OCR extraction for {}", document.file_name);

        // Removed on drop, including every early return below.
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input");
        tokio::fs::write(&input, &document.bytes).await?;

        let pages = match kind {
            DocumentKind::Pdf => self.rasterize(&input, workdir.path()).await?,
            _ => vec![input],
        };

        let total = pages.len();
        let mut texts = Vec::with_capacity(total);
        for (idx, page) in pages.iter().enumerate() {
            debug!(page = idx + 1, total, "Recognising page");
            texts.push(self.recognize(page).await?);
        }

        let text = texts.join("\n").trim().to_string();
        info!(pages = total, chars = text.chars().count(), "OCR complete");
        Ok(text)
    }
}

/// Keeps the rendered PNGs from a scratch directory listing, in page order.
fn page_images(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut pages: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    // pdftoppm zero-pads page numbers, so lexical order is page order.
    pages.sort();
    pages
}

async fn require_tool(program: &str, version_flag: &str) -> Result<(), ExtractError> {
    Command::new(program)
        .arg(version_flag)
        .kill_on_drop(true)
        .output()
        .await
        .map(|_| ())
        .map_err(|e| ExtractError::Unavailable(format!("{program} is not installed: {e}")))
}
