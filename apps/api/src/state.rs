use std::sync::Arc;

use crate::config::Config;
use crate::extraction::quality::QualityGate;
use crate::extraction::ExtractorChain;
use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only immutable, request-independent collaborators.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup. Default: `GeminiClient`.
    pub llm: Arc<dyn LlmGateway>,
    /// Structured text layer first, OCR fallback second.
    pub extractors: Arc<ExtractorChain>,
    pub quality_gate: QualityGate,
}
