//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::pipeline::analyze_resume;
use crate::errors::AppError;
use crate::extraction::Document;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const TARGET_ROLE_FIELD: &str = "targetRole";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub target_role: String,
    pub file_name: String,
    pub extracted_chars: usize,
    pub analysis: AnalysisResult,
}

/// POST /resume/upload
///
/// Multipart form: `resume` (file, required) and `targetRole` (text, optional).
/// Extracts the resume text and returns an ATS-style review.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let request_id = Uuid::new_v4();
    async move {
        let (document, target_role) = read_upload(multipart).await?;
        info!(
            bytes = document.bytes.len(),
            "Received resume upload {}", document.file_name
        );

        let file_name = document.file_name.clone();
        let outcome = analyze_resume(
            document,
            target_role,
            &state.extractors,
            &state.quality_gate,
            state.llm.as_ref(),
        )
        .await?;
        info!(
            source = ?outcome.source,
            extracted_chars = outcome.extracted_chars,
            "Upload analysed"
        );

        Ok::<_, AppError>(Json(UploadResponse {
            target_role: outcome.target_role,
            file_name,
            extracted_chars: outcome.extracted_chars,
            analysis: outcome.analysis,
        }))
    }
    .instrument(info_span!("resume_upload", %request_id))
    .await
}

async fn read_upload(mut multipart: Multipart) -> Result<(Document, Option<String>), AppError> {
    let mut document = None;
    let mut target_role = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await?;
                document = Some(Document::new(bytes, file_name));
            }
            Some(TARGET_ROLE_FIELD) => target_role = Some(field.text().await?),
            _ => {}
        }
    }

    let document = document.ok_or_else(|| {
        AppError::Validation(
            "No resume file uploaded. Attach the file in the 'resume' form field.".to_string(),
        )
    })?;
    if document.bytes.is_empty() {
        return Err(AppError::Validation("The uploaded resume file is empty.".to_string()));
    }

    Ok((document, target_role))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analysis::pipeline::DEFAULT_TARGET_ROLE;
    use crate::config::Config;
    use crate::extraction::pdf_text::test_support::text_layer_pdf;
    use crate::extraction::pdf_text::PdfTextExtractor;
    use crate::extraction::quality::QualityGate;
    use crate::extraction::test_support::FakeExtractor;
    use crate::extraction::{ExtractionSource, ExtractorChain};
    use crate::llm_client::test_support::FakeGateway;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "resume-test-boundary";
    const VALID_REPLY: &str = r#"Here is your analysis:
```json
{"atsScore": 71, "strengths": ["Good project variety"], "weakAreas": ["No metrics"], "missingSkills": ["Testing"], "projectGaps": ["No deployed links"], "quickFixes": ["Add a portfolio URL"], "oneLineVerdict": "Solid fresher resume."}
```"#;

    struct Harness {
        structured: Arc<FakeExtractor>,
        ocr: Arc<FakeExtractor>,
        llm: Arc<FakeGateway>,
    }

    impl Harness {
        fn new(structured_text: &str, ocr_text: &str, llm: FakeGateway) -> Self {
            Self {
                structured: FakeExtractor::ok(ExtractionSource::StructuredExtraction, structured_text),
                ocr: FakeExtractor::ok(ExtractionSource::OcrExtraction, ocr_text),
                llm: Arc::new(llm),
            }
        }

        fn state(&self) -> AppState {
            AppState {
                config: Config::from_lookup(|k| (k == "API_KEY").then(|| "test".to_string()))
                    .unwrap(),
                llm: self.llm.clone(),
                extractors: Arc::new(ExtractorChain::new(vec![
                    self.structured.clone(),
                    self.ocr.clone(),
                ])),
                quality_gate: QualityGate::default(),
            }
        }

        async fn upload(&self, body: Vec<u8>) -> (StatusCode, Value) {
            post_upload(self.state(), body).await
        }
    }

    async fn post_upload(state: AppState, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::post("/resume/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn multipart(file: Option<(&str, &[u8])>, target_role: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(role) = target_role {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"targetRole\"\r\n\r\n{role}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    const PDF: &[u8] = b"%PDF-1.7\n% test document\n";

    #[tokio::test]
    async fn test_text_layer_pdf_uses_default_role() {
        let h = Harness::new(&"r".repeat(500), "unused", FakeGateway::replying(VALID_REPLY));

        let (status, json) = h.upload(multipart(Some(("jane.pdf", PDF)), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["targetRole"], DEFAULT_TARGET_ROLE);
        assert_eq!(json["fileName"], "jane.pdf");
        assert_eq!(json["extractedChars"], 500);
        assert_eq!(json["analysis"]["atsScore"], 71);
        assert_eq!(h.ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_real_text_layer_never_reaches_ocr() {
        let ocr = FakeExtractor::ok(ExtractionSource::OcrExtraction, "should not be used");
        let llm = Arc::new(FakeGateway::replying(VALID_REPLY));
        let state = AppState {
            config: Config::from_lookup(|k| (k == "API_KEY").then(|| "test".to_string()))
                .unwrap(),
            llm: llm.clone(),
            extractors: Arc::new(ExtractorChain::new(vec![
                Arc::new(PdfTextExtractor),
                ocr.clone(),
            ])),
            quality_gate: QualityGate::default(),
        };
        let pdf = text_layer_pdf(
            "Jane Doe Software Developer Rust Python SQL Built a CLI todo app deployed",
        );

        let body = multipart(Some(("jane.pdf", &pdf[..])), None);

        let (status, json) = post_upload(state, body).await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert!(json["extractedChars"].as_u64().unwrap() >= 50);
        assert_eq!(ocr.calls(), 0);
        assert!(llm.last_prompt().unwrap().contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_scanned_pdf_falls_back_to_ocr() {
        let h = Harness::new("", &"o".repeat(120), FakeGateway::replying(VALID_REPLY));

        let (status, json) = h
            .upload(multipart(Some(("scan.pdf", PDF)), Some("Data Analyst")))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["extractedChars"], 120);
        assert_eq!(json["targetRole"], "Data Analyst");
        assert!(json["analysis"].is_object());
        assert_eq!(h.structured.calls(), 1);
        assert_eq!(h.ocr.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let h = Harness::new("0123456789", "", FakeGateway::replying(VALID_REPLY));

        let (status, json) = h.upload(multipart(Some(("tiny.pdf", PDF)), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Insufficient text"));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected() {
        let h = Harness::new("", "", FakeGateway::replying(VALID_REPLY));

        let (status, json) = h.upload(multipart(Some(("blank.pdf", PDF)), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("No text could be extracted"));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_returns_500_without_analysis() {
        let h = Harness::new(&"r".repeat(300), "", FakeGateway::failing(502));

        let (status, json) = h.upload(multipart(Some(("jane.pdf", PDF)), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("analysis failed"));
        assert!(json.get("analysis").is_none());
    }

    #[tokio::test]
    async fn test_non_json_reply_returns_500() {
        let h = Harness::new(
            &"r".repeat(300),
            "",
            FakeGateway::replying("I'm unable to review this document."),
        );

        let (status, json) = h.upload(multipart(Some(("jane.pdf", PDF)), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("unreadable response"));
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let h = Harness::new("", "", FakeGateway::replying(VALID_REPLY));

        let (status, json) = h.upload(multipart(None, Some("Backend Engineer"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("No resume file uploaded"));
        assert_eq!(h.structured.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let h = Harness::new("", "", FakeGateway::replying(VALID_REPLY));

        let (status, json) = h.upload(multipart(Some(("empty.pdf", &b""[..])), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_prompt_carries_target_role() {
        let h = Harness::new(&"r".repeat(100), "", FakeGateway::replying(VALID_REPLY));

        let (status, _) = h
            .upload(multipart(Some(("jane.pdf", PDF)), Some("DevOps Engineer")))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(h
            .llm
            .last_prompt()
            .unwrap()
            .contains("TARGET ROLE: \"DevOps Engineer\""));
    }
}
