//! Document Analysis Agent
//!
//! Summarizes an uploaded PDF with the fast model. Only the first
//! [`ANALYSIS_CHAR_LIMIT`] characters of the extracted text are sent.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::documents::{truncate_chars, TextExtractor};
use crate::llm::ModelEndpoints;
use crate::session::{CachedAnalysis, SessionContext};
use crate::types::{AppError, AppResult, LLMMessage};

pub const ANALYSIS_CHAR_LIMIT: usize = 4000;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    #[serde(flatten)]
    pub analysis: CachedAnalysis,
    /// True when the summary came from the session cache
    pub cached: bool,
}

pub struct AnalysisAgent;

impl AnalysisAgent {
    pub fn create_prompt(text: &str) -> String {
        format!(
            "Analyze the following text and provide a summary of key findings: {}",
            truncate_chars(text, ANALYSIS_CHAR_LIMIT)
        )
    }

    pub fn document_digest(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    /// Summarize `data`, reusing the session's cached summary when the same
    /// document was analyzed before.
    pub async fn analyze(
        session: &mut SessionContext,
        models: &ModelEndpoints,
        extractor: Arc<dyn TextExtractor>,
        filename: Option<String>,
        data: Bytes,
    ) -> AppResult<DocumentAnalysis> {
        if data.is_empty() {
            return Err(AppError::InvalidRequest("Uploaded document is empty".to_string()));
        }

        let digest = Self::document_digest(&data);
        if let Some(cached) = session.pdf_analysis.as_ref().filter(|c| c.document_digest == digest) {
            info!(session_id = %session.id(), digest = %digest, "Reusing cached document analysis");
            return Ok(DocumentAnalysis {
                analysis: cached.clone(),
                cached: true,
            });
        }

        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&data))
            .await
            .map_err(|e| AppError::Internal(format!("Text extraction task failed: {}", e)))??;

        if text.trim().is_empty() {
            warn!(filename = ?filename, "Document has no extractable text");
        }

        info!(
            filename = ?filename,
            extracted_chars = text.chars().count(),
            "Requesting document summary"
        );

        let summary = models
            .complete_fast(vec![LLMMessage::user(Self::create_prompt(&text))])
            .await?;

        let analysis = CachedAnalysis {
            document_digest: digest,
            filename,
            summary,
        };
        session.pdf_analysis = Some(analysis.clone());

        Ok(DocumentAnalysis {
            analysis,
            cached: false,
        })
    }
}
