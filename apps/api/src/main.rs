mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ocr::TesseractOcr;
use crate::extraction::pdf_text::PdfTextExtractor;
use crate::extraction::quality::QualityGate;
use crate::extraction::{ExtractorChain, TextExtractor};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client once; every request shares it
    let llm = GeminiClient::new(config.api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Extraction strategies in priority order: text layer, then OCR
    let strategies: Vec<Arc<dyn TextExtractor>> = vec![
        Arc::new(PdfTextExtractor),
        Arc::new(TesseractOcr::new(config.ocr_lang.clone(), config.ocr_dpi)),
    ];
    info!(
        "Extraction chain ready (ocr_lang={}, ocr_dpi={}, min_text_chars={})",
        config.ocr_lang, config.ocr_dpi, config.min_text_chars
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        extractors: Arc::new(ExtractorChain::new(strategies)),
        quality_gate: QualityGate::new(config.min_text_chars),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
