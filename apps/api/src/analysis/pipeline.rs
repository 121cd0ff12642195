//! Resume Analysis — orchestrates one upload from bytes to structured review.
//!
//! Flow: extractor chain (structured → OCR) → quality gate → prompt build →
//!       LLM call → JSON coercion → schema decode.
//!
//! Every stage runs at most once, strictly in order. Nothing is retried here;
//! retries belong to the gateway implementation.

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::coercion::{coerce_json, CoercionError};
use crate::analysis::prompts::build_analysis_prompt;
use crate::extraction::quality::{QualityError, QualityGate};
use crate::extraction::{Document, ExtractError, ExtractionSource, ExtractorChain};
use crate::llm_client::{LlmError, LlmGateway};
use crate::models::analysis::AnalysisResult;

/// Used when the caller omits `targetRole` or sends it blank.
pub const DEFAULT_TARGET_ROLE: &str = "Software Developer(Fresher)";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no text could be extracted from the document")]
    ExtractionEmpty,

    #[error("extracted text has {chars} characters, minimum is {min}")]
    TextTooShort { chars: usize, min: usize },

    #[error("document extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("LLM gateway error: {0}")]
    Upstream(#[from] LlmError),

    #[error("malformed analysis: {0}")]
    MalformedAnalysis(String),
}

/// Terminal failure states of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The document is at fault; the caller can fix it.
    RejectedInput,
    /// The model provider failed or replied with garbage.
    UpstreamFailure,
    /// Server-side fault unrelated to the document or the provider.
    Internal,
}

impl PipelineError {
    pub fn outcome(&self) -> FailureOutcome {
        match self {
            PipelineError::ExtractionEmpty | PipelineError::TextTooShort { .. } => {
                FailureOutcome::RejectedInput
            }
            PipelineError::Extraction(e) if e.is_document_fault() => FailureOutcome::RejectedInput,
            PipelineError::Extraction(_) => FailureOutcome::Internal,
            PipelineError::Upstream(_) | PipelineError::MalformedAnalysis(_) => {
                FailureOutcome::UpstreamFailure
            }
        }
    }
}

impl From<QualityError> for PipelineError {
    fn from(e: QualityError) -> Self {
        match e {
            QualityError::Empty => PipelineError::ExtractionEmpty,
            QualityError::TooShort { chars, min } => PipelineError::TextTooShort { chars, min },
        }
    }
}

impl From<CoercionError> for PipelineError {
    fn from(e: CoercionError) -> Self {
        PipelineError::MalformedAnalysis(e.to_string())
    }
}

/// Built once the quality gate passes.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub target_role: String,
    pub resume_text: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub target_role: String,
    pub extracted_chars: usize,
    pub source: ExtractionSource,
    pub analysis: AnalysisResult,
}

pub fn resolve_target_role(target_role: Option<String>) -> String {
    target_role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_TARGET_ROLE.to_string())
}

/// Runs the full pipeline for one document.
pub async fn analyze_resume(
    document: Document,
    target_role: Option<String>,
    extractors: &ExtractorChain,
    gate: &QualityGate,
    llm: &dyn LlmGateway,
) -> Result<AnalysisOutcome, PipelineError> {
    let extraction = extractors.extract(&document).await?;

    let extracted_chars = gate.check(&extraction.text).inspect_err(|e| {
        warn!(source = ?extraction.source, "Rejected {}: {e}", document.file_name);
    })?;

    let request = AnalysisRequest {
        target_role: resolve_target_role(target_role),
        resume_text: extraction.text,
    };

    let analysis = request_analysis(&request, llm).await?;
    info!(
        ats_score = analysis.ats_score,
        "Analysed {} for role {:?}", document.file_name, request.target_role
    );

    Ok(AnalysisOutcome {
        target_role: request.target_role,
        extracted_chars,
        source: extraction.source,
        analysis,
    })
}

/// Prompt → LLM → coercion → schema decode.
pub async fn request_analysis(
    request: &AnalysisRequest,
    llm: &dyn LlmGateway,
) -> Result<AnalysisResult, PipelineError> {
    let prompt = build_analysis_prompt(&request.target_role, &request.resume_text);
    let raw = llm.send(&prompt).await?;

    let value = coerce_json(&raw)?;
    serde_json::from_value::<AnalysisResult>(value).map_err(|e| {
        PipelineError::MalformedAnalysis(format!("response does not match analysis schema: {e}"))
    })
}
