// PDF text extraction backed by lopdf

use lopdf::Document;
use tracing::{debug, warn};

use super::TextExtractor;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, data: &[u8]) -> AppResult<String> {
        let doc = Document::load_mem(data)
            .map_err(|e| AppError::Document(format!("Failed to read PDF: {}", e)))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut text = String::new();

        for page in &pages {
            // One unreadable page should not sink the whole document
            match doc.extract_text(&[*page]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => warn!(page = *page, error = %e, "Skipping page without extractable text"),
            }
        }

        debug!(page_count = pages.len(), char_count = text.chars().count(), "Extracted PDF text");
        Ok(text)
    }
}
